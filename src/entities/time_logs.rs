use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One attendance record per user per calendar day. Uniqueness is enforced by
/// lookup-before-insert in the time-log service, not by a database constraint.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "time_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub date: Date,

    pub start_time: Time,

    pub end_time: Time,

    pub break_minutes: i32,

    /// Derived: (end - start - break) in hours.
    pub total_hours: f64,

    pub notes: Option<String>,

    pub is_approved: bool,

    pub created_at: DateTimeUtc,

    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "NoAction"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
