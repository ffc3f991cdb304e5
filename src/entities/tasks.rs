use sea_orm::entity::prelude::*;

use super::enums::{TaskPriority, TaskStatus};

/// Status and its companion fields move together: `is_approved` implies
/// `Approved` with `approved_at`/`approved_by` set; the service layer is the
/// only writer and keeps them consistent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    pub assigned_to: i32,

    pub created_by: i32,

    pub project_id: Option<i32>,

    pub estimated_hours: f64,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    pub due_date: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub started_at: Option<DateTimeUtc>,

    pub completed_at: Option<DateTimeUtc>,

    pub is_approved: bool,

    pub approved_at: Option<DateTimeUtc>,

    pub approved_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedTo",
        to = "super::users::Column::Id",
        on_delete = "NoAction"
    )]
    Assignee,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_delete = "SetNull"
    )]
    Project,

    #[sea_orm(has_many = "super::task_time_entries::Entity")]
    TimeEntries,
}

impl Related<super::task_time_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeEntries.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
