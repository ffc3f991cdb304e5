//! Domain service for daily attendance logs.
//!
//! One log per user per calendar day. Worked hours are derived from the
//! start/end times minus the break, never supplied by the client.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::time_logs;
use crate::services::CurrentUser;

/// Errors specific to time-log operations.
#[derive(Debug, Error)]
pub enum TimeLogError {
    #[error("Time log not found")]
    NotFound,

    #[error("A time log already exists for this date")]
    Conflict,

    #[error("Approved logs cannot be modified")]
    Immutable,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for TimeLogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TimeLogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// One team member's logs, for the manager overview.
#[derive(Debug, Serialize)]
pub struct TeamMemberLogs {
    pub user_id: i32,
    pub name: String,
    pub logs: Vec<time_logs::Model>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogTimeRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub break_minutes: i32,
    pub notes: Option<String>,
}

/// Worked hours for one day, rounded to two decimals.
/// 09:00-17:30 with a 30 minute break is exactly 8.00.
pub fn total_hours(
    start: NaiveTime,
    end: NaiveTime,
    break_minutes: i32,
) -> Result<f64, TimeLogError> {
    if end <= start {
        return Err(TimeLogError::Validation(
            "End time must be after start time".to_string(),
        ));
    }
    if break_minutes < 0 {
        return Err(TimeLogError::Validation(
            "Break minutes must not be negative".to_string(),
        ));
    }

    let span_minutes = (end - start).num_minutes();
    if i64::from(break_minutes) > span_minutes {
        return Err(TimeLogError::Validation(
            "Break cannot exceed the working period".to_string(),
        ));
    }

    let worked_minutes = span_minutes - i64::from(break_minutes);
    #[allow(clippy::cast_precision_loss)]
    let hours = worked_minutes as f64 / 60.0;
    Ok((hours * 100.0).round() / 100.0)
}

/// Domain service trait for attendance logging.
#[async_trait::async_trait]
pub trait TimeLogService: Send + Sync {
    /// Records a day's attendance for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogError::Conflict`] if a log already exists for the
    /// date.
    async fn log_time(
        &self,
        caller: &CurrentUser,
        req: LogTimeRequest,
    ) -> Result<time_logs::Model, TimeLogError>;

    /// Fetches a single log; owner or manager/admin.
    async fn get_log(&self, caller: &CurrentUser, id: i32)
    -> Result<time_logs::Model, TimeLogError>;

    /// All of the caller's logs, newest first.
    async fn list_my_logs(&self, caller: &CurrentUser)
    -> Result<Vec<time_logs::Model>, TimeLogError>;

    /// Another user's logs. Managers and admins only.
    async fn list_logs_for_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
    ) -> Result<Vec<time_logs::Model>, TimeLogError>;

    /// Rewrites an unapproved log. Owner only.
    async fn update_log(
        &self,
        caller: &CurrentUser,
        id: i32,
        req: LogTimeRequest,
    ) -> Result<time_logs::Model, TimeLogError>;

    /// Removes an unapproved log. Owner only.
    async fn delete_log(&self, caller: &CurrentUser, id: i32) -> Result<(), TimeLogError>;

    /// Locks a log against further edits. Managers and admins only.
    async fn approve_log(
        &self,
        caller: &CurrentUser,
        id: i32,
    ) -> Result<time_logs::Model, TimeLogError>;

    /// Sum of the caller's logged hours over an inclusive date range.
    async fn total_hours_in_range(
        &self,
        caller: &CurrentUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64, TimeLogError>;

    /// Combined hours a set of users logged on one day. Managers and admins
    /// only.
    async fn total_hours_for_users_on(
        &self,
        caller: &CurrentUser,
        date: NaiveDate,
        user_ids: Vec<i32>,
    ) -> Result<f64, TimeLogError>;

    /// Logs of each of a manager's direct reports. Managers and admins only.
    async fn team_logs(
        &self,
        caller: &CurrentUser,
        manager_id: i32,
    ) -> Result<Vec<TeamMemberLogs>, TimeLogError>;
}

#[cfg(test)]
mod tests {
    use super::{TimeLogError, total_hours};
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn standard_day_is_eight_hours() {
        let hours = total_hours(t(9, 0), t(17, 30), 30).unwrap();
        assert!((hours - 8.00).abs() < f64::EPSILON);
    }

    #[test]
    fn no_break_counts_full_span() {
        let hours = total_hours(t(10, 0), t(14, 15), 0).unwrap();
        assert!((hours - 4.25).abs() < f64::EPSILON);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = total_hours(t(17, 0), t(9, 0), 0).unwrap_err();
        assert!(matches!(err, TimeLogError::Validation(_)));
    }

    #[test]
    fn end_equal_to_start_is_rejected() {
        let err = total_hours(t(9, 0), t(9, 0), 0).unwrap_err();
        assert!(matches!(err, TimeLogError::Validation(_)));
    }

    #[test]
    fn break_longer_than_span_is_rejected() {
        let err = total_hours(t(9, 0), t(10, 0), 90).unwrap_err();
        assert!(matches!(err, TimeLogError::Validation(_)));
    }

    #[test]
    fn break_equal_to_span_is_zero_hours() {
        let hours = total_hours(t(9, 0), t(10, 0), 60).unwrap();
        assert!(hours.abs() < f64::EPSILON);
    }
}
