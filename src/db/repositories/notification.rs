use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::notifications;

pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, user_id: i32, kind: &str, message: &str) -> Result<()> {
        let active = notifications::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            message: Set(message.to_string()),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now()),
            read_at: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert notification")?;

        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<Option<notifications::Model>> {
        notifications::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query notification by id")
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<notifications::Model>> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list notifications for user")
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.conn)
            .await
            .context("Failed to count unread notifications")
    }

    pub async fn mark_read(&self, notification: notifications::Model) -> Result<()> {
        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        active.read_at = Set(Some(chrono::Utc::now()));
        active.update(&self.conn).await?;

        Ok(())
    }
}
