use serde::Serialize;

use crate::entities::enums::Role;

pub mod task_service;
pub mod task_service_impl;
pub use task_service::{CreateTaskRequest, TaskError, TaskService, TaskView, UpdateTaskRequest};
pub use task_service_impl::SeaOrmTaskService;

pub mod time_log_service;
pub mod time_log_service_impl;
pub use time_log_service::{LogTimeRequest, TimeLogError, TimeLogService};
pub use time_log_service_impl::SeaOrmTimeLogService;

pub mod registration_service;
pub mod registration_service_impl;
pub use registration_service::{ApplyRequest, RegistrationError, RegistrationService};
pub use registration_service_impl::SeaOrmRegistrationService;

pub mod productivity_service;
pub mod productivity_service_impl;
pub use productivity_service::{ProductivityError, ProductivityReport, ProductivityService};
pub use productivity_service_impl::SeaOrmProductivityService;

pub mod notification_service;
pub mod notification_service_impl;
pub use notification_service::{NotificationError, NotificationService};
pub use notification_service_impl::SeaOrmNotificationService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod directory_service;
pub mod directory_service_impl;
pub use directory_service::{DirectoryError, DirectoryService, UserProfile};
pub use directory_service_impl::SeaOrmDirectoryService;

pub mod reminders;
pub use reminders::ReminderService;

pub mod scheduler;
pub use scheduler::Scheduler;

/// Authenticated identity resolved by the auth middleware and threaded
/// through every service call.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub name: String,
    pub role: Role,
}
