//! `SeaORM` implementation of the `NotificationService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::notifications;
use crate::services::CurrentUser;
use crate::services::notification_service::{
    NotificationError, NotificationService, deadline_message,
};

pub struct SeaOrmNotificationService {
    store: Store,
}

impl SeaOrmNotificationService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationService for SeaOrmNotificationService {
    async fn notify(
        &self,
        user_id: i32,
        kind: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        self.store.add_notification(user_id, kind, message).await?;
        Ok(())
    }

    async fn send_task_assigned(
        &self,
        user_id: i32,
        task_title: &str,
    ) -> Result<(), NotificationError> {
        let message =
            format!("New task assigned: '{task_title}'. Please review and start working on it.");
        self.notify(user_id, "TaskAssigned", &message).await
    }

    async fn send_log_reminder(&self, user_id: i32) -> Result<(), NotificationError> {
        self.notify(
            user_id,
            "LogReminder",
            "Reminder: Please log your work hours for today.",
        )
        .await
    }

    async fn send_task_deadline(
        &self,
        user_id: i32,
        task_title: &str,
        due_date: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), NotificationError> {
        let days_remaining = (due_date.date_naive() - chrono::Utc::now().date_naive()).num_days();
        let message = deadline_message(task_title, days_remaining, due_date.date_naive());
        self.notify(user_id, "TaskDeadline", &message).await
    }

    async fn create(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        kind: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        if !caller.role.is_manager_or_admin() {
            return Err(NotificationError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }
        if message.trim().is_empty() {
            return Err(NotificationError::Validation(
                "Message must not be empty".to_string(),
            ));
        }
        if self.store.get_user(user_id).await?.is_none() {
            return Err(NotificationError::UserNotFound);
        }

        self.notify(user_id, kind, message).await
    }

    async fn list_mine(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<notifications::Model>, NotificationError> {
        Ok(self.store.list_notifications(caller.id).await?)
    }

    async fn list_unread(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<notifications::Model>, NotificationError> {
        Ok(self
            .store
            .list_notifications(caller.id)
            .await?
            .into_iter()
            .filter(|n| !n.is_read)
            .collect())
    }

    async fn unread_count(&self, caller: &CurrentUser) -> Result<u64, NotificationError> {
        Ok(self.store.unread_notification_count(caller.id).await?)
    }

    async fn mark_read(&self, caller: &CurrentUser, id: i32) -> Result<(), NotificationError> {
        let notification = self
            .store
            .get_notification(id)
            .await?
            .ok_or(NotificationError::NotFound)?;

        if notification.user_id != caller.id {
            return Err(NotificationError::Forbidden(
                "Not allowed to acknowledge another user's notification".to_string(),
            ));
        }
        if notification.is_read {
            return Ok(());
        }

        self.store.mark_notification_read(notification).await?;
        Ok(())
    }

    async fn mark_all_read(&self, caller: &CurrentUser) -> Result<(), NotificationError> {
        let unread: Vec<notifications::Model> = self
            .store
            .list_notifications(caller.id)
            .await?
            .into_iter()
            .filter(|n| !n.is_read)
            .collect();

        for notification in unread {
            self.store.mark_notification_read(notification).await?;
        }
        Ok(())
    }
}
