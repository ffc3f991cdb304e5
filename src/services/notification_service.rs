//! Domain service for the in-app notification sink.
//!
//! Other services push messages here; users read and acknowledge them.
//! Delivery is best-effort: workflow operations warn and carry on when a
//! notification write fails.

use thiserror::Error;

use crate::entities::notifications;
use crate::services::CurrentUser;

/// Errors specific to notification operations.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for NotificationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for NotificationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for notifications.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Stores a raw notification for a user.
    async fn notify(
        &self,
        user_id: i32,
        kind: &str,
        message: &str,
    ) -> Result<(), NotificationError>;

    /// "New task assigned" template.
    async fn send_task_assigned(
        &self,
        user_id: i32,
        task_title: &str,
    ) -> Result<(), NotificationError>;

    /// Daily "log your hours" reminder template.
    async fn send_log_reminder(&self, user_id: i32) -> Result<(), NotificationError>;

    /// Deadline warning template; wording escalates to "urgent" at one day
    /// remaining.
    async fn send_task_deadline(
        &self,
        user_id: i32,
        task_title: &str,
        due_date: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), NotificationError>;

    /// Stores a notification on behalf of the caller. Managers and admins
    /// only; the target user must exist.
    async fn create(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        kind: &str,
        message: &str,
    ) -> Result<(), NotificationError>;

    /// The caller's notifications, newest first.
    async fn list_mine(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<notifications::Model>, NotificationError>;

    /// The caller's unread notifications, newest first.
    async fn list_unread(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<notifications::Model>, NotificationError>;

    /// Count of the caller's unread notifications.
    async fn unread_count(&self, caller: &CurrentUser) -> Result<u64, NotificationError>;

    /// Acknowledges one notification. Owner only.
    async fn mark_read(&self, caller: &CurrentUser, id: i32) -> Result<(), NotificationError>;

    /// Acknowledges everything unread for the caller.
    async fn mark_all_read(&self, caller: &CurrentUser) -> Result<(), NotificationError>;
}

/// Deadline message, shared with the reminder job.
#[must_use]
pub fn deadline_message(task_title: &str, days_remaining: i64, due: chrono::NaiveDate) -> String {
    let urgency = if days_remaining <= 1 {
        "urgent".to_string()
    } else {
        format!("due in {days_remaining} days")
    };
    format!(
        "Task '{task_title}' is {urgency}. Please complete it by {}.",
        due.format("%b %d, %Y")
    )
}

#[cfg(test)]
mod tests {
    use super::deadline_message;
    use chrono::NaiveDate;

    #[test]
    fn imminent_deadline_is_urgent() {
        let due = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let msg = deadline_message("Ship release", 1, due);
        assert_eq!(
            msg,
            "Task 'Ship release' is urgent. Please complete it by Jun 10, 2025."
        );
    }

    #[test]
    fn distant_deadline_counts_days() {
        let due = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        let msg = deadline_message("Ship release", 3, due);
        assert_eq!(
            msg,
            "Task 'Ship release' is due in 3 days. Please complete it by Jun 12, 2025."
        );
    }

    #[test]
    fn overdue_deadline_is_urgent() {
        let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let msg = deadline_message("Ship release", -2, due);
        assert!(msg.contains("urgent"));
    }
}
