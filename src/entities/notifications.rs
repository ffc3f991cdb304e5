use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    /// Free-form tag: "TaskAssigned", "TaskRejected", "LogReminder",
    /// "TaskDeadline", "Welcome", ...
    pub kind: String,

    pub message: String,

    pub is_read: bool,

    pub created_at: DateTimeUtc,

    pub read_at: Option<DateTimeUtc>,
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
