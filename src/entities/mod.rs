pub mod prelude;

pub mod enums;
pub mod notifications;
pub mod pending_registrations;
pub mod projects;
pub mod task_time_entries;
pub mod tasks;
pub mod time_logs;
pub mod users;
