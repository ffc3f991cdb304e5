//! Domain service for the task approval workflow.
//!
//! Tasks move Pending -> InProgress -> Completed -> Approved. Approval is
//! terminal; a manager can instead reject completed work, which sends the
//! task back to InProgress.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::enums::{TaskPriority, TaskStatus};
use crate::entities::{task_time_entries, tasks};
use crate::services::CurrentUser;

/// Errors specific to task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,

    #[error("Assignee not found")]
    AssigneeNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Fields accepted when a manager creates a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: i32,
    pub project_id: Option<i32>,
    pub estimated_hours: f64,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Mutable fields on an existing task. `None` leaves a field untouched.
/// Reassignment notifies the new assignee.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
    pub estimated_hours: Option<f64>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Task view returned to the API layer, with derived flags resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: i32,
    pub created_by: i32,
    pub project_id: Option<i32>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i32>,
}

impl TaskView {
    #[must_use]
    pub fn from_model(task: tasks::Model, actual_hours: f64, now: DateTime<Utc>) -> Self {
        let is_overdue = is_overdue(&task, now);
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            assigned_to: task.assigned_to,
            created_by: task.created_by,
            project_id: task.project_id,
            estimated_hours: task.estimated_hours,
            actual_hours,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            is_overdue,
            created_at: task.created_at,
            started_at: task.started_at,
            completed_at: task.completed_at,
            is_approved: task.is_approved,
            approved_at: task.approved_at,
            approved_by: task.approved_by,
        }
    }
}

/// A task counts as overdue only while still open: once completed or
/// approved it can no longer become late.
#[must_use]
pub fn is_overdue(task: &tasks::Model, now: DateTime<Utc>) -> bool {
    match task.status {
        TaskStatus::Completed | TaskStatus::Approved => false,
        TaskStatus::Pending | TaskStatus::InProgress => {
            task.due_date.is_some_and(|due| due < now)
        }
    }
}

/// Domain service trait for task management.
#[async_trait::async_trait]
pub trait TaskService: Send + Sync {
    /// Creates a task and notifies the assignee. Managers and admins only.
    async fn create_task(
        &self,
        caller: &CurrentUser,
        req: CreateTaskRequest,
    ) -> Result<TaskView, TaskError>;

    /// Fetches a single task. Employees may only see their own assignments.
    async fn get_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError>;

    /// Tasks assigned to the caller.
    async fn list_my_tasks(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError>;

    /// Every task in the system. Managers and admins only.
    async fn list_all_tasks(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError>;

    /// Pending -> InProgress. Only the assignee may start their task.
    async fn start_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError>;

    /// InProgress -> Completed. Only the assignee may complete their task.
    async fn complete_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError>;

    /// Completed -> Approved. Managers and admins only; terminal.
    async fn approve_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError>;

    /// Completed -> InProgress. Managers and admins only; clears the
    /// completion timestamp and notifies the assignee.
    async fn reject_task(
        &self,
        caller: &CurrentUser,
        id: i32,
        reason: Option<String>,
    ) -> Result<TaskView, TaskError>;

    /// Edits descriptive fields. Managers and admins only; approved tasks
    /// are immutable.
    async fn update_task(
        &self,
        caller: &CurrentUser,
        id: i32,
        req: UpdateTaskRequest,
    ) -> Result<TaskView, TaskError>;

    /// Deletes an open task. Managers and admins only; completed and
    /// approved tasks are kept for the audit trail.
    async fn delete_task(&self, caller: &CurrentUser, id: i32) -> Result<(), TaskError>;

    /// Records hours worked against a task on a given day.
    async fn log_task_time(
        &self,
        caller: &CurrentUser,
        task_id: i32,
        date: NaiveDate,
        hours: f64,
        work_description: Option<String>,
    ) -> Result<task_time_entries::Model, TaskError>;

    /// All time entries for a task.
    async fn list_task_time(
        &self,
        caller: &CurrentUser,
        task_id: i32,
    ) -> Result<Vec<task_time_entries::Model>, TaskError>;

    /// Completed-but-unapproved tasks created by the caller. Managers and
    /// admins only.
    async fn list_awaiting_approval(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<TaskView>, TaskError>;

    /// Open tasks past their due date. Managers and admins only.
    async fn list_overdue(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError>;
}
