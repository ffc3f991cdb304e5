pub mod notification;
pub mod registration;
pub mod task;
pub mod task_time;
pub mod time_log;
pub mod user;
