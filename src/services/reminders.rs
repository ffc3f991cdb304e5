//! Background reminder sweeps, run by the scheduler.

use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Store;
use crate::entities::enums::UserStatus;
use crate::services::notification_service::NotificationService;

pub struct ReminderService {
    store: Store,
    notifier: Arc<dyn NotificationService>,
}

impl ReminderService {
    #[must_use]
    pub fn new(store: Store, notifier: Arc<dyn NotificationService>) -> Self {
        Self { store, notifier }
    }

    /// Nudges every active user who has not filed a time log for today.
    /// Returns the number of reminders sent.
    pub async fn send_log_reminders(&self) -> Result<usize> {
        let today = Utc::now().date_naive();
        let mut sent = 0;

        for user in self.store.list_users().await? {
            if user.status != UserStatus::Active {
                continue;
            }
            if self
                .store
                .get_time_log_for_user_on(user.id, today)
                .await?
                .is_some()
            {
                continue;
            }

            if let Err(err) = self.notifier.send_log_reminder(user.id).await {
                warn!("Failed to send log reminder to user {}: {err}", user.id);
            } else {
                sent += 1;
            }
        }

        info!(reminders = sent, "Daily log reminder sweep finished");
        Ok(sent)
    }

    /// Warns assignees about open tasks due within the window. Returns the
    /// number of warnings sent.
    pub async fn send_deadline_reminders(&self, window_days: i64) -> Result<usize> {
        let now = Utc::now();
        let tasks = self
            .store
            .list_tasks_due_between(now, now + Duration::days(window_days))
            .await?;
        let mut sent = 0;

        for task in tasks {
            let Some(due) = task.due_date else { continue };
            if let Err(err) = self
                .notifier
                .send_task_deadline(task.assigned_to, &task.title, due)
                .await
            {
                warn!("Failed to send deadline reminder for task {}: {err}", task.id);
            } else {
                sent += 1;
            }
        }

        info!(reminders = sent, "Deadline reminder sweep finished");
        Ok(sent)
    }
}
