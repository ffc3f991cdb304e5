//! `SeaORM` implementation of the `TaskService` trait.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;

use crate::db::{NewTask, Store};
use crate::entities::enums::TaskStatus;
use crate::entities::{task_time_entries, tasks};
use crate::services::CurrentUser;
use crate::services::notification_service::NotificationService;
use crate::services::task_service::{
    CreateTaskRequest, TaskError, TaskService, TaskView, UpdateTaskRequest,
};
use std::sync::Arc;

pub struct SeaOrmTaskService {
    store: Store,
    notifier: Arc<dyn NotificationService>,
}

impl SeaOrmTaskService {
    #[must_use]
    pub fn new(store: Store, notifier: Arc<dyn NotificationService>) -> Self {
        Self { store, notifier }
    }

    async fn load(&self, id: i32) -> Result<tasks::Model, TaskError> {
        self.store.get_task(id).await?.ok_or(TaskError::NotFound)
    }

    async fn actual_hours(&self, task_id: i32) -> Result<f64, TaskError> {
        let entries = self.store.list_task_time_entries(task_id).await?;
        Ok(entries.iter().map(|e| e.hours).sum())
    }

    async fn to_view(&self, task: tasks::Model) -> Result<TaskView, TaskError> {
        let hours = self.actual_hours(task.id).await?;
        Ok(TaskView::from_model(task, hours, Utc::now()))
    }

    async fn to_views(&self, tasks: Vec<tasks::Model>) -> Result<Vec<TaskView>, TaskError> {
        let mut views = Vec::with_capacity(tasks.len());
        for task in tasks {
            views.push(self.to_view(task).await?);
        }
        Ok(views)
    }
}

fn require_manager(caller: &CurrentUser) -> Result<(), TaskError> {
    if caller.role.is_manager_or_admin() {
        Ok(())
    } else {
        Err(TaskError::Forbidden(
            "Manager or admin role required".to_string(),
        ))
    }
}

fn require_assignee(caller: &CurrentUser, task: &tasks::Model) -> Result<(), TaskError> {
    if task.assigned_to == caller.id {
        Ok(())
    } else {
        Err(TaskError::Forbidden(
            "Only the assignee may act on this task".to_string(),
        ))
    }
}

#[async_trait]
impl TaskService for SeaOrmTaskService {
    async fn create_task(
        &self,
        caller: &CurrentUser,
        req: CreateTaskRequest,
    ) -> Result<TaskView, TaskError> {
        require_manager(caller)?;

        if req.title.trim().is_empty() {
            return Err(TaskError::Validation("Title must not be empty".to_string()));
        }
        if req.estimated_hours <= 0.0 {
            return Err(TaskError::Validation(
                "Estimated hours must be positive".to_string(),
            ));
        }

        let assignee = self
            .store
            .get_user(req.assigned_to)
            .await?
            .ok_or(TaskError::AssigneeNotFound)?;

        let task = self
            .store
            .create_task(NewTask {
                title: req.title,
                description: req.description,
                assigned_to: assignee.id,
                created_by: caller.id,
                project_id: req.project_id,
                estimated_hours: req.estimated_hours,
                priority: req.priority,
                due_date: req.due_date,
            })
            .await?;

        // Notification failure must not fail task creation
        if let Err(err) = self
            .notifier
            .send_task_assigned(assignee.id, &task.title)
            .await
        {
            tracing::warn!("Failed to notify assignee of task {}: {err}", task.id);
        }

        self.to_view(task).await
    }

    async fn get_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError> {
        let task = self.load(id).await?;
        if !caller.role.is_manager_or_admin() && task.assigned_to != caller.id {
            return Err(TaskError::Forbidden(
                "Not allowed to view this task".to_string(),
            ));
        }
        self.to_view(task).await
    }

    async fn list_my_tasks(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError> {
        let tasks = self.store.list_tasks_for_assignee(caller.id).await?;
        self.to_views(tasks).await
    }

    async fn list_all_tasks(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError> {
        require_manager(caller)?;
        let tasks = self.store.list_tasks().await?;
        self.to_views(tasks).await
    }

    async fn start_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError> {
        let task = self.load(id).await?;
        require_assignee(caller, &task)?;

        match task.status {
            TaskStatus::Pending => {}
            other => {
                return Err(TaskError::InvalidTransition(format!(
                    "Cannot start a task in status {other:?}"
                )));
            }
        }

        let mut active: tasks::ActiveModel = task.into();
        active.status = Set(TaskStatus::InProgress);
        active.started_at = Set(Some(Utc::now()));
        let task = self.store.update_task(active).await?;

        self.to_view(task).await
    }

    async fn complete_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError> {
        let task = self.load(id).await?;
        require_assignee(caller, &task)?;

        match task.status {
            TaskStatus::InProgress => {}
            other => {
                return Err(TaskError::InvalidTransition(format!(
                    "Cannot complete a task in status {other:?}"
                )));
            }
        }

        let mut active: tasks::ActiveModel = task.into();
        active.status = Set(TaskStatus::Completed);
        active.completed_at = Set(Some(Utc::now()));
        let task = self.store.update_task(active).await?;

        self.to_view(task).await
    }

    async fn approve_task(&self, caller: &CurrentUser, id: i32) -> Result<TaskView, TaskError> {
        require_manager(caller)?;
        let task = self.load(id).await?;

        match task.status {
            TaskStatus::Completed => {}
            TaskStatus::Approved => {
                return Err(TaskError::InvalidTransition(
                    "Task is already approved".to_string(),
                ));
            }
            other => {
                return Err(TaskError::InvalidTransition(format!(
                    "Only completed tasks can be approved, not {other:?}"
                )));
            }
        }

        let mut active: tasks::ActiveModel = task.into();
        active.status = Set(TaskStatus::Approved);
        active.is_approved = Set(true);
        active.approved_at = Set(Some(Utc::now()));
        active.approved_by = Set(Some(caller.id));
        let task = self.store.update_task(active).await?;

        self.to_view(task).await
    }

    async fn reject_task(
        &self,
        caller: &CurrentUser,
        id: i32,
        reason: Option<String>,
    ) -> Result<TaskView, TaskError> {
        require_manager(caller)?;
        let task = self.load(id).await?;

        match task.status {
            TaskStatus::Completed => {}
            other => {
                return Err(TaskError::InvalidTransition(format!(
                    "Only completed tasks can be rejected, not {other:?}"
                )));
            }
        }

        let assignee_id = task.assigned_to;
        let title = task.title.clone();

        let mut active: tasks::ActiveModel = task.into();
        active.status = Set(TaskStatus::InProgress);
        active.completed_at = Set(None);
        let task = self.store.update_task(active).await?;

        let message = match reason {
            Some(reason) => {
                format!("Task '{title}' was rejected and needs rework: {reason}")
            }
            None => format!("Task '{title}' was rejected and needs rework."),
        };
        if let Err(err) = self
            .notifier
            .notify(assignee_id, "TaskRejected", &message)
            .await
        {
            tracing::warn!("Failed to notify assignee of rejected task {id}: {err}");
        }

        self.to_view(task).await
    }

    async fn update_task(
        &self,
        caller: &CurrentUser,
        id: i32,
        req: UpdateTaskRequest,
    ) -> Result<TaskView, TaskError> {
        require_manager(caller)?;
        let task = self.load(id).await?;

        if task.status == TaskStatus::Approved {
            return Err(TaskError::InvalidTransition(
                "Approved tasks are immutable".to_string(),
            ));
        }

        if let Some(title) = &req.title
            && title.trim().is_empty()
        {
            return Err(TaskError::Validation("Title must not be empty".to_string()));
        }
        if let Some(hours) = req.estimated_hours
            && hours <= 0.0
        {
            return Err(TaskError::Validation(
                "Estimated hours must be positive".to_string(),
            ));
        }

        let reassigned_to = match req.assigned_to {
            Some(new_assignee) if new_assignee != task.assigned_to => {
                self.store
                    .get_user(new_assignee)
                    .await?
                    .ok_or(TaskError::AssigneeNotFound)?;
                Some(new_assignee)
            }
            _ => None,
        };

        let mut active: tasks::ActiveModel = task.into();
        if let Some(title) = req.title {
            active.title = Set(title);
        }
        if let Some(description) = req.description {
            active.description = Set(Some(description));
        }
        if let Some(new_assignee) = reassigned_to {
            active.assigned_to = Set(new_assignee);
        }
        if let Some(hours) = req.estimated_hours {
            active.estimated_hours = Set(hours);
        }
        if let Some(priority) = req.priority {
            active.priority = Set(priority);
        }
        if let Some(due_date) = req.due_date {
            active.due_date = Set(Some(due_date));
        }
        let task = self.store.update_task(active).await?;

        if let Some(new_assignee) = reassigned_to
            && let Err(err) = self
                .notifier
                .send_task_assigned(new_assignee, &task.title)
                .await
        {
            tracing::warn!("Failed to notify new assignee of task {}: {err}", task.id);
        }

        self.to_view(task).await
    }

    async fn delete_task(&self, caller: &CurrentUser, id: i32) -> Result<(), TaskError> {
        require_manager(caller)?;
        let task = self.load(id).await?;

        // Completed work stays on record
        match task.status {
            TaskStatus::Completed | TaskStatus::Approved => {
                return Err(TaskError::InvalidTransition(
                    "Completed or approved tasks cannot be deleted".to_string(),
                ));
            }
            TaskStatus::Pending | TaskStatus::InProgress => {}
        }

        self.store.delete_task(id).await?;
        Ok(())
    }

    async fn log_task_time(
        &self,
        caller: &CurrentUser,
        task_id: i32,
        date: NaiveDate,
        hours: f64,
        work_description: Option<String>,
    ) -> Result<task_time_entries::Model, TaskError> {
        let task = self.load(task_id).await?;
        require_assignee(caller, &task)?;

        if !(0.1..=24.0).contains(&hours) {
            return Err(TaskError::Validation(
                "Hours must be between 0.1 and 24".to_string(),
            ));
        }

        // Time entries are additive bookkeeping; the task's lifecycle state
        // does not gate them.
        let entry = self
            .store
            .add_task_time_entry(task_id, caller.id, date, hours, work_description.as_deref())
            .await?;

        Ok(entry)
    }

    async fn list_task_time(
        &self,
        caller: &CurrentUser,
        task_id: i32,
    ) -> Result<Vec<task_time_entries::Model>, TaskError> {
        let task = self.load(task_id).await?;
        if !caller.role.is_manager_or_admin() && task.assigned_to != caller.id {
            return Err(TaskError::Forbidden(
                "Not allowed to view time for this task".to_string(),
            ));
        }

        Ok(self.store.list_task_time_entries(task_id).await?)
    }

    async fn list_awaiting_approval(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<TaskView>, TaskError> {
        require_manager(caller)?;
        let tasks = self.store.list_tasks_awaiting_approval(caller.id).await?;
        self.to_views(tasks).await
    }

    async fn list_overdue(&self, caller: &CurrentUser) -> Result<Vec<TaskView>, TaskError> {
        require_manager(caller)?;
        let tasks = self.store.list_overdue_tasks(Utc::now()).await?;
        self.to_views(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::enums::{TaskPriority, TaskStatus};
    use crate::entities::tasks;
    use crate::services::task_service::is_overdue;
    use chrono::{Duration, Utc};

    fn task(status: TaskStatus, due_offset_hours: i64) -> tasks::Model {
        let now = Utc::now();
        tasks::Model {
            id: 1,
            title: "Quarterly report".to_string(),
            description: None,
            assigned_to: 2,
            created_by: 1,
            project_id: None,
            estimated_hours: 8.0,
            status,
            priority: TaskPriority::Medium,
            due_date: Some(now + Duration::hours(due_offset_hours)),
            created_at: now - Duration::days(3),
            started_at: None,
            completed_at: None,
            is_approved: false,
            approved_at: None,
            approved_by: None,
        }
    }

    #[test]
    fn open_task_past_due_is_overdue() {
        let now = Utc::now();
        assert!(is_overdue(&task(TaskStatus::Pending, -2), now));
        assert!(is_overdue(&task(TaskStatus::InProgress, -2), now));
    }

    #[test]
    fn open_task_before_due_is_not_overdue() {
        let now = Utc::now();
        assert!(!is_overdue(&task(TaskStatus::Pending, 2), now));
    }

    #[test]
    fn finished_tasks_are_never_overdue() {
        let now = Utc::now();
        assert!(!is_overdue(&task(TaskStatus::Completed, -48), now));
        assert!(!is_overdue(&task(TaskStatus::Approved, -48), now));
    }

    #[test]
    fn task_without_due_date_is_not_overdue() {
        let now = Utc::now();
        let mut t = task(TaskStatus::InProgress, -2);
        t.due_date = None;
        assert!(!is_overdue(&t, now));
    }
}
