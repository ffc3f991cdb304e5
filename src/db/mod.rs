use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::enums::{RegistrationStatus, Role, UserStatus};
use crate::entities::{notifications, pending_registrations, task_time_entries, tasks, time_logs, users};

pub mod migrator;
pub mod repositories;

pub use repositories::task::NewTask;
pub use repositories::time_log::NewTimeLog;
pub use repositories::user::{generate_token, hash_password, verify_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    fn task_time_repo(&self) -> repositories::task_time::TaskTimeRepository {
        repositories::task_time::TaskTimeRepository::new(self.conn.clone())
    }

    fn time_log_repo(&self) -> repositories::time_log::TimeLogRepository {
        repositories::time_log::TimeLogRepository::new(self.conn.clone())
    }

    fn registration_repo(&self) -> repositories::registration::RegistrationRepository {
        repositories::registration::RegistrationRepository::new(self.conn.clone())
    }

    fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_token(token).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_all().await
    }

    pub async fn list_users_by_department(&self, department: &str) -> Result<Vec<users::Model>> {
        self.user_repo().list_by_department(department).await
    }

    pub async fn list_direct_reports(&self, manager_id: i32) -> Result<Vec<users::Model>> {
        self.user_repo().list_by_manager(manager_id).await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        department: Option<&str>,
        manager_id: Option<i32>,
    ) -> Result<users::Model> {
        self.user_repo()
            .create(name, email, password_hash, role, department, manager_id)
            .await
    }

    pub async fn update_user(&self, active: users::ActiveModel) -> Result<users::Model> {
        self.user_repo().update(active).await
    }

    pub async fn set_user_token(&self, user: users::Model, token: Option<String>) -> Result<()> {
        self.user_repo().set_token(user, token).await
    }

    pub async fn set_user_status(&self, user: users::Model, status: UserStatus) -> Result<()> {
        self.user_repo().set_status(user, status).await
    }

    pub async fn update_user_password(
        &self,
        user: users::Model,
        new_password: &str,
    ) -> Result<()> {
        self.user_repo().update_password(user, new_password).await
    }

    // ========== Tasks ==========

    pub async fn get_task(&self, id: i32) -> Result<Option<tasks::Model>> {
        self.task_repo().get(id).await
    }

    pub async fn create_task(&self, task: NewTask) -> Result<tasks::Model> {
        self.task_repo().create(task).await
    }

    pub async fn update_task(&self, active: tasks::ActiveModel) -> Result<tasks::Model> {
        self.task_repo().update(active).await
    }

    pub async fn delete_task(&self, id: i32) -> Result<bool> {
        self.task_repo().delete(id).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_all().await
    }

    pub async fn list_tasks_for_assignee(&self, user_id: i32) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_for_assignee(user_id).await
    }

    pub async fn list_tasks_awaiting_approval(&self, created_by: i32) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_awaiting_approval(created_by).await
    }

    pub async fn list_overdue_tasks(&self, now: DateTime<Utc>) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_overdue(now).await
    }

    pub async fn list_tasks_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<tasks::Model>> {
        self.task_repo().list_due_between(from, to).await
    }

    pub async fn list_tasks_assigned_in_range(
        &self,
        user_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<tasks::Model>> {
        self.task_repo()
            .list_assigned_in_range(user_id, from, to)
            .await
    }

    // ========== Task time entries ==========

    pub async fn add_task_time_entry(
        &self,
        task_id: i32,
        user_id: i32,
        date: NaiveDate,
        hours: f64,
        work_description: Option<&str>,
    ) -> Result<task_time_entries::Model> {
        self.task_time_repo()
            .add(task_id, user_id, date, hours, work_description)
            .await
    }

    pub async fn list_task_time_entries(
        &self,
        task_id: i32,
    ) -> Result<Vec<task_time_entries::Model>> {
        self.task_time_repo().list_for_task(task_id).await
    }

    pub async fn list_user_task_time_in_range(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<task_time_entries::Model>> {
        self.task_time_repo()
            .list_for_user_in_range(user_id, from, to)
            .await
    }

    // ========== Time logs ==========

    pub async fn get_time_log(&self, id: i32) -> Result<Option<time_logs::Model>> {
        self.time_log_repo().get(id).await
    }

    pub async fn get_time_log_for_user_on(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> Result<Option<time_logs::Model>> {
        self.time_log_repo().get_for_user_on(user_id, date).await
    }

    pub async fn create_time_log(&self, log: NewTimeLog) -> Result<time_logs::Model> {
        self.time_log_repo().create(log).await
    }

    pub async fn update_time_log(&self, active: time_logs::ActiveModel) -> Result<time_logs::Model> {
        self.time_log_repo().update(active).await
    }

    pub async fn delete_time_log(&self, id: i32) -> Result<bool> {
        self.time_log_repo().delete(id).await
    }

    pub async fn list_time_logs_for_user(&self, user_id: i32) -> Result<Vec<time_logs::Model>> {
        self.time_log_repo().list_for_user(user_id).await
    }

    pub async fn total_time_logged_by_users_on(
        &self,
        user_ids: &[i32],
        date: NaiveDate,
    ) -> Result<f64> {
        self.time_log_repo()
            .total_hours_for_users_on(user_ids, date)
            .await
    }

    pub async fn list_time_logs_in_range(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<time_logs::Model>> {
        self.time_log_repo()
            .list_for_user_in_range(user_id, from, to)
            .await
    }

    // ========== Registrations ==========

    pub async fn get_registration(&self, id: i32) -> Result<Option<pending_registrations::Model>> {
        self.registration_repo().get(id).await
    }

    pub async fn get_pending_registration_by_email(
        &self,
        email: &str,
    ) -> Result<Option<pending_registrations::Model>> {
        self.registration_repo().get_by_email(email).await
    }

    pub async fn create_registration(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        department: &str,
    ) -> Result<pending_registrations::Model> {
        self.registration_repo()
            .create(name, email, password_hash, role, department)
            .await
    }

    pub async fn list_pending_registrations(&self) -> Result<Vec<pending_registrations::Model>> {
        self.registration_repo().list_pending().await
    }

    pub async fn list_registrations_by_status(
        &self,
        status: RegistrationStatus,
    ) -> Result<Vec<pending_registrations::Model>> {
        self.registration_repo().list_by_status(status).await
    }

    pub async fn pending_registration_count(&self) -> Result<u64> {
        self.registration_repo().pending_count().await
    }

    pub async fn list_all_registrations(&self) -> Result<Vec<pending_registrations::Model>> {
        self.registration_repo().list_all().await
    }

    pub async fn approve_registration(
        &self,
        registration: pending_registrations::Model,
        approved_by: i32,
    ) -> Result<users::Model> {
        self.registration_repo()
            .approve(registration, approved_by)
            .await
    }

    pub async fn reject_registration(
        &self,
        registration: pending_registrations::Model,
        rejected_by: i32,
        reason: Option<&str>,
    ) -> Result<()> {
        self.registration_repo()
            .reject(registration, rejected_by, reason)
            .await
    }

    pub async fn delete_registration(&self, id: i32) -> Result<bool> {
        self.registration_repo().delete(id).await
    }

    // ========== Notifications ==========

    pub async fn add_notification(&self, user_id: i32, kind: &str, message: &str) -> Result<()> {
        self.notification_repo().add(user_id, kind, message).await
    }

    pub async fn get_notification(&self, id: i32) -> Result<Option<notifications::Model>> {
        self.notification_repo().get(id).await
    }

    pub async fn list_notifications(&self, user_id: i32) -> Result<Vec<notifications::Model>> {
        self.notification_repo().list_for_user(user_id).await
    }

    pub async fn unread_notification_count(&self, user_id: i32) -> Result<u64> {
        self.notification_repo().unread_count(user_id).await
    }

    pub async fn mark_notification_read(&self, notification: notifications::Model) -> Result<()> {
        self.notification_repo().mark_read(notification).await
    }
}
