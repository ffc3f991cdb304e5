use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::task_time_entries;

pub struct TaskTimeRepository {
    conn: DatabaseConnection,
}

impl TaskTimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        task_id: i32,
        user_id: i32,
        date: NaiveDate,
        hours: f64,
        work_description: Option<&str>,
    ) -> Result<task_time_entries::Model> {
        let active = task_time_entries::ActiveModel {
            id: NotSet,
            task_id: Set(task_id),
            user_id: Set(user_id),
            date: Set(date),
            hours: Set(hours),
            work_description: Set(work_description.map(str::to_string)),
            created_at: Set(chrono::Utc::now()),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert task time entry")
    }

    pub async fn list_for_task(&self, task_id: i32) -> Result<Vec<task_time_entries::Model>> {
        task_time_entries::Entity::find()
            .filter(task_time_entries::Column::TaskId.eq(task_id))
            .order_by_asc(task_time_entries::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list time entries for task")
    }

    pub async fn list_for_user_in_range(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<task_time_entries::Model>> {
        task_time_entries::Entity::find()
            .filter(task_time_entries::Column::UserId.eq(user_id))
            .filter(task_time_entries::Column::Date.gte(from))
            .filter(task_time_entries::Column::Date.lte(to))
            .order_by_asc(task_time_entries::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list time entries for user in range")
    }
}
