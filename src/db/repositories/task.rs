use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::enums::{TaskPriority, TaskStatus};
use crate::entities::tasks;

/// Fields accepted when creating a task; everything else is derived.
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: i32,
    pub created_by: i32,
    pub project_id: Option<i32>,
    pub estimated_hours: f64,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<tasks::Model>> {
        tasks::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query task by id")
    }

    pub async fn create(&self, task: NewTask) -> Result<tasks::Model> {
        let active = tasks::ActiveModel {
            id: NotSet,
            title: Set(task.title),
            description: Set(task.description),
            assigned_to: Set(task.assigned_to),
            created_by: Set(task.created_by),
            project_id: Set(task.project_id),
            estimated_hours: Set(task.estimated_hours),
            status: Set(TaskStatus::Pending),
            priority: Set(task.priority),
            due_date: Set(task.due_date),
            created_at: Set(Utc::now()),
            started_at: Set(None),
            completed_at: Set(None),
            is_approved: Set(false),
            approved_at: Set(None),
            approved_by: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert task")
    }

    pub async fn update(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        active
            .update(&self.conn)
            .await
            .context("Failed to update task")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let res = tasks::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;

        Ok(res.rows_affected > 0)
    }

    pub async fn list_for_assignee(&self, user_id: i32) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::AssignedTo.eq(user_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list tasks for assignee")
    }

    pub async fn list_all(&self) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .order_by_desc(tasks::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")
    }

    /// Tasks completed but not yet approved, created by the given manager.
    pub async fn list_awaiting_approval(&self, created_by: i32) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::Status.eq(TaskStatus::Completed))
            .filter(tasks::Column::IsApproved.eq(false))
            .filter(tasks::Column::CreatedBy.eq(created_by))
            .order_by_asc(tasks::Column::CompletedAt)
            .all(&self.conn)
            .await
            .context("Failed to list tasks awaiting approval")
    }

    /// Tasks past their due date that are still open. Terminal states
    /// (Completed, Approved) never count as overdue.
    pub async fn list_overdue(&self, now: DateTime<Utc>) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::DueDate.lt(now))
            .filter(
                Condition::all()
                    .add(tasks::Column::Status.ne(TaskStatus::Completed))
                    .add(tasks::Column::Status.ne(TaskStatus::Approved)),
            )
            .order_by_asc(tasks::Column::DueDate)
            .all(&self.conn)
            .await
            .context("Failed to list overdue tasks")
    }

    /// Open tasks across all assignees whose due date falls inside the
    /// window, used by the deadline reminder job.
    pub async fn list_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::DueDate.gte(from))
            .filter(tasks::Column::DueDate.lte(to))
            .filter(
                Condition::all()
                    .add(tasks::Column::Status.ne(TaskStatus::Completed))
                    .add(tasks::Column::Status.ne(TaskStatus::Approved)),
            )
            .all(&self.conn)
            .await
            .context("Failed to list tasks nearing their deadline")
    }

    /// Tasks assigned to a user that were created inside the reporting range.
    pub async fn list_assigned_in_range(
        &self,
        user_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::AssignedTo.eq(user_id))
            .filter(tasks::Column::CreatedAt.gte(from))
            .filter(tasks::Column::CreatedAt.lte(to))
            .all(&self.conn)
            .await
            .context("Failed to list tasks assigned in range")
    }
}
