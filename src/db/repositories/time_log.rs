use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::time_logs;

pub struct NewTimeLog {
    pub user_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i32,
    pub total_hours: f64,
    pub notes: Option<String>,
}

pub struct TimeLogRepository {
    conn: DatabaseConnection,
}

impl TimeLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<time_logs::Model>> {
        time_logs::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query time log by id")
    }

    /// At most one log exists per (user, date); the service checks this
    /// before inserting.
    pub async fn get_for_user_on(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> Result<Option<time_logs::Model>> {
        time_logs::Entity::find()
            .filter(time_logs::Column::UserId.eq(user_id))
            .filter(time_logs::Column::Date.eq(date))
            .one(&self.conn)
            .await
            .context("Failed to query time log by user and date")
    }

    pub async fn create(&self, log: NewTimeLog) -> Result<time_logs::Model> {
        let active = time_logs::ActiveModel {
            id: NotSet,
            user_id: Set(log.user_id),
            date: Set(log.date),
            start_time: Set(log.start_time),
            end_time: Set(log.end_time),
            break_minutes: Set(log.break_minutes),
            total_hours: Set(log.total_hours),
            notes: Set(log.notes),
            is_approved: Set(false),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert time log")
    }

    pub async fn update(&self, active: time_logs::ActiveModel) -> Result<time_logs::Model> {
        active
            .update(&self.conn)
            .await
            .context("Failed to update time log")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let res = time_logs::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete time log")?;

        Ok(res.rows_affected > 0)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<time_logs::Model>> {
        time_logs::Entity::find()
            .filter(time_logs::Column::UserId.eq(user_id))
            .order_by_desc(time_logs::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list time logs for user")
    }

    /// Combined hours a group of users logged on one day.
    pub async fn total_hours_for_users_on(
        &self,
        user_ids: &[i32],
        date: NaiveDate,
    ) -> Result<f64> {
        let logs = time_logs::Entity::find()
            .filter(time_logs::Column::UserId.is_in(user_ids.to_vec()))
            .filter(time_logs::Column::Date.eq(date))
            .all(&self.conn)
            .await
            .context("Failed to sum time logs for users on date")?;

        Ok(logs.iter().map(|l| l.total_hours).sum())
    }

    pub async fn list_for_user_in_range(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<time_logs::Model>> {
        time_logs::Entity::find()
            .filter(time_logs::Column::UserId.eq(user_id))
            .filter(time_logs::Column::Date.gte(from))
            .filter(time_logs::Column::Date.lte(to))
            .order_by_asc(time_logs::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list time logs for user in range")
    }
}
