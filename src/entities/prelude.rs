pub use super::notifications::Entity as Notifications;
pub use super::pending_registrations::Entity as PendingRegistrations;
pub use super::projects::Entity as Projects;
pub use super::task_time_entries::Entity as TaskTimeEntries;
pub use super::tasks::Entity as Tasks;
pub use super::time_logs::Entity as TimeLogs;
pub use super::users::Entity as Users;
