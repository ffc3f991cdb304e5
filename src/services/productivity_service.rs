//! Read-only productivity reporting over task and attendance history.
//!
//! The efficiency formula blends two inputs with fixed, asymmetric weights:
//! the task-focus ratio is scaled by 60 while the 0-100 completion rate is
//! scaled by 0.4, capped at 100. The weighting is a documented business
//! rule and must not be "corrected".

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::services::CurrentUser;

/// Errors specific to productivity reporting.
#[derive(Debug, Error)]
pub enum ProductivityError {
    #[error("User not found")]
    UserNotFound,

    #[error("No users found in department: {0}")]
    EmptyDepartment(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ProductivityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProductivityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Hours and activity for one calendar day inside the report range.
#[derive(Debug, Clone, Serialize)]
pub struct DailyProductivity {
    pub date: NaiveDate,
    pub hours_logged: f64,
    pub logs_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductivityReport {
    pub report_scope: &'static str,
    pub target_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_hours_logged: f64,
    pub total_tasks_assigned: usize,
    pub tasks_completed: usize,
    pub task_completion_rate: f64,
    pub average_task_completion_time: f64,
    pub efficiency_score: f64,
    pub daily_breakdown: Vec<DailyProductivity>,
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of in-range tasks that reached Completed, as a 0-100 percentage.
#[must_use]
pub fn completion_rate(completed: usize, assigned: usize) -> f64 {
    if assigned == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    round2(completed as f64 / assigned as f64 * 100.0)
}

/// `min(100, round(focus_ratio * 60 + completion_rate * 0.4, 2))`, where the
/// focus ratio is task-entry hours over attendance hours. Zero attendance
/// means a zero score.
#[must_use]
pub fn efficiency_score(task_hours: f64, logged_hours: f64, completion_rate: f64) -> f64 {
    if logged_hours == 0.0 {
        return 0.0;
    }
    let focus_ratio = task_hours / logged_hours;
    let score = round2(focus_ratio * 60.0 + completion_rate * 0.4);
    score.min(100.0)
}

/// Domain service trait for productivity reports.
#[async_trait::async_trait]
pub trait ProductivityService: Send + Sync {
    /// Full report for one user over an inclusive date range. Employees may
    /// only request their own; managers and admins may request anyone's.
    async fn user_report(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProductivityReport, ProductivityError>;

    /// Aggregated report across every user in a department. Managers and
    /// admins only.
    async fn department_report(
        &self,
        caller: &CurrentUser,
        department: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProductivityReport, ProductivityError>;

    /// Just the caller's efficiency score for the range.
    async fn my_efficiency(
        &self,
        caller: &CurrentUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64, ProductivityError>;

    /// Just the caller's completion rate for the range.
    async fn my_completion_rate(
        &self,
        caller: &CurrentUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64, ProductivityError>;
}

#[cfg(test)]
mod tests {
    use super::{completion_rate, efficiency_score, round2};

    #[test]
    fn completion_rate_rounds_to_two_decimals() {
        assert!((completion_rate(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((completion_rate(2, 3) - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_rate_with_no_tasks_is_zero() {
        assert!(completion_rate(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn efficiency_blends_focus_and_completion() {
        // 20 of 40 hours on tasks, 50% completion: 0.5*60 + 50*0.4 = 50
        let score = efficiency_score(20.0, 40.0, 50.0);
        assert!((score - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn efficiency_is_capped_at_one_hundred() {
        // Focus ratio above 1 (more task hours than attendance) can push the
        // raw score past the cap
        let score = efficiency_score(80.0, 40.0, 100.0);
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn efficiency_without_logged_hours_is_zero() {
        assert!(efficiency_score(10.0, 0.0, 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert!((round2(8.006) - 8.01).abs() < f64::EPSILON);
        assert!((round2(8.004) - 8.0).abs() < f64::EPSILON);
    }
}
