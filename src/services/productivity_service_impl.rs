//! `SeaORM` implementation of the `ProductivityService` trait.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use crate::db::Store;
use crate::entities::enums::{TaskStatus, UserStatus};
use crate::entities::users;
use crate::services::CurrentUser;
use crate::services::productivity_service::{
    DailyProductivity, ProductivityError, ProductivityReport, ProductivityService,
    completion_rate, efficiency_score, round2,
};

pub struct SeaOrmProductivityService {
    store: Store,
}

/// Per-user aggregates shared by the user and department reports.
struct UserAggregates {
    logged_hours: f64,
    assigned: usize,
    completed: usize,
    completion_rate: f64,
    efficiency: f64,
}

impl SeaOrmProductivityService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn aggregates_for(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<UserAggregates, ProductivityError> {
        let (range_start, range_end) = range_bounds(from, to);

        let logs = self.store.list_time_logs_in_range(user_id, from, to).await?;
        let logged_hours: f64 = logs.iter().map(|l| l.total_hours).sum();

        let entries = self
            .store
            .list_user_task_time_in_range(user_id, from, to)
            .await?;
        let task_hours: f64 = entries.iter().map(|e| e.hours).sum();

        let tasks = self
            .store
            .list_tasks_assigned_in_range(user_id, range_start, range_end)
            .await?;
        let assigned = tasks.len();
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();

        let rate = completion_rate(completed, assigned);
        let efficiency = efficiency_score(task_hours, logged_hours, rate);

        Ok(UserAggregates {
            logged_hours,
            assigned,
            completed,
            completion_rate: rate,
            efficiency,
        })
    }

    async fn require_user(&self, user_id: i32) -> Result<users::Model, ProductivityError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(ProductivityError::UserNotFound)
    }
}

fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), ProductivityError> {
    if from > to {
        return Err(ProductivityError::Validation(
            "Start date must not be after end date".to_string(),
        ));
    }
    Ok(())
}

/// Inclusive day range as UTC instants, for filtering timestamp columns.
fn range_bounds(
    from: NaiveDate,
    to: NaiveDate,
) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(
        &to.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)),
    );
    (start, end)
}

#[async_trait]
impl ProductivityService for SeaOrmProductivityService {
    async fn user_report(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProductivityReport, ProductivityError> {
        validate_range(from, to)?;
        if user_id != caller.id && !caller.role.is_manager_or_admin() {
            return Err(ProductivityError::Forbidden(
                "Not allowed to view another user's report".to_string(),
            ));
        }

        let user = self.require_user(user_id).await?;
        let agg = self.aggregates_for(user_id, from, to).await?;

        let (range_start, range_end) = range_bounds(from, to);
        let tasks = self
            .store
            .list_tasks_assigned_in_range(user_id, range_start, range_end)
            .await?;

        // Mean time-to-complete over tasks that actually finished in range
        #[allow(clippy::cast_precision_loss)]
        let completion_hours: Vec<f64> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
            .map(|d| d.num_minutes() as f64 / 60.0)
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let avg_completion_time = if completion_hours.is_empty() {
            0.0
        } else {
            round2(completion_hours.iter().sum::<f64>() / completion_hours.len() as f64)
        };

        let logs = self.store.list_time_logs_in_range(user_id, from, to).await?;
        let mut daily_breakdown = Vec::new();
        let mut day = from;
        while day <= to {
            let day_logs: Vec<_> = logs.iter().filter(|l| l.date == day).collect();
            daily_breakdown.push(DailyProductivity {
                date: day,
                hours_logged: day_logs.iter().map(|l| l.total_hours).sum(),
                logs_count: day_logs.len(),
            });
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }

        Ok(ProductivityReport {
            report_scope: "User",
            target_name: user.name,
            start_date: from,
            end_date: to,
            total_hours_logged: agg.logged_hours,
            total_tasks_assigned: agg.assigned,
            tasks_completed: agg.completed,
            task_completion_rate: agg.completion_rate,
            average_task_completion_time: avg_completion_time,
            efficiency_score: agg.efficiency,
            daily_breakdown,
        })
    }

    async fn department_report(
        &self,
        caller: &CurrentUser,
        department: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProductivityReport, ProductivityError> {
        validate_range(from, to)?;
        if !caller.role.is_manager_or_admin() {
            return Err(ProductivityError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }

        // Deactivated accounts keep their history but drop out of reporting
        let members: Vec<users::Model> = self
            .store
            .list_users_by_department(department)
            .await?
            .into_iter()
            .filter(|u| u.status == UserStatus::Active)
            .collect();
        if members.is_empty() {
            return Err(ProductivityError::EmptyDepartment(department.to_string()));
        }

        let mut total_hours = 0.0;
        let mut total_assigned = 0;
        let mut total_completed = 0;
        let mut efficiency_sum = 0.0;

        for member in &members {
            let agg = self.aggregates_for(member.id, from, to).await?;
            total_hours += agg.logged_hours;
            total_assigned += agg.assigned;
            total_completed += agg.completed;
            efficiency_sum += agg.efficiency;
        }

        #[allow(clippy::cast_precision_loss)]
        let avg_efficiency = round2(efficiency_sum / members.len() as f64);

        Ok(ProductivityReport {
            report_scope: "Department",
            target_name: department.to_string(),
            start_date: from,
            end_date: to,
            total_hours_logged: total_hours,
            total_tasks_assigned: total_assigned,
            tasks_completed: total_completed,
            task_completion_rate: completion_rate(total_completed, total_assigned),
            // Not tracked at department granularity
            average_task_completion_time: 0.0,
            efficiency_score: avg_efficiency,
            daily_breakdown: Vec::new(),
        })
    }

    async fn my_efficiency(
        &self,
        caller: &CurrentUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64, ProductivityError> {
        validate_range(from, to)?;
        let agg = self.aggregates_for(caller.id, from, to).await?;
        Ok(agg.efficiency)
    }

    async fn my_completion_rate(
        &self,
        caller: &CurrentUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64, ProductivityError> {
        validate_range(from, to)?;
        let agg = self.aggregates_for(caller.id, from, to).await?;
        Ok(agg.completion_rate)
    }
}
