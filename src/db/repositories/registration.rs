use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::enums::{RegistrationStatus, Role, UserStatus};
use crate::entities::{pending_registrations, users};

pub struct RegistrationRepository {
    conn: DatabaseConnection,
}

impl RegistrationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<pending_registrations::Model>> {
        pending_registrations::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query registration by id")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<pending_registrations::Model>> {
        pending_registrations::Entity::find()
            .filter(pending_registrations::Column::Email.eq(email))
            .filter(pending_registrations::Column::Status.eq(RegistrationStatus::Pending))
            .one(&self.conn)
            .await
            .context("Failed to query pending registration by email")
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        department: &str,
    ) -> Result<pending_registrations::Model> {
        let active = pending_registrations::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role),
            department: Set(department.to_string()),
            status: Set(RegistrationStatus::Pending),
            applied_at: Set(chrono::Utc::now()),
            processed_at: Set(None),
            processed_by: Set(None),
            rejection_reason: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert registration")
    }

    pub async fn list_pending(&self) -> Result<Vec<pending_registrations::Model>> {
        pending_registrations::Entity::find()
            .filter(pending_registrations::Column::Status.eq(RegistrationStatus::Pending))
            .order_by_asc(pending_registrations::Column::AppliedAt)
            .all(&self.conn)
            .await
            .context("Failed to list pending registrations")
    }

    pub async fn list_by_status(
        &self,
        status: RegistrationStatus,
    ) -> Result<Vec<pending_registrations::Model>> {
        pending_registrations::Entity::find()
            .filter(pending_registrations::Column::Status.eq(status))
            .order_by_desc(pending_registrations::Column::AppliedAt)
            .all(&self.conn)
            .await
            .context("Failed to list registrations by status")
    }

    pub async fn pending_count(&self) -> Result<u64> {
        pending_registrations::Entity::find()
            .filter(pending_registrations::Column::Status.eq(RegistrationStatus::Pending))
            .count(&self.conn)
            .await
            .context("Failed to count pending registrations")
    }

    pub async fn list_all(&self) -> Result<Vec<pending_registrations::Model>> {
        pending_registrations::Entity::find()
            .order_by_desc(pending_registrations::Column::AppliedAt)
            .all(&self.conn)
            .await
            .context("Failed to list registrations")
    }

    /// Approve a registration and create the account as one unit: either
    /// both rows land or neither does.
    pub async fn approve(
        &self,
        registration: pending_registrations::Model,
        approved_by: i32,
    ) -> Result<users::Model> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin approval transaction")?;

        let now = chrono::Utc::now();

        let user = users::ActiveModel {
            id: NotSet,
            name: Set(registration.name.clone()),
            email: Set(registration.email.clone()),
            password_hash: Set(registration.password_hash.clone()),
            api_token: Set(None),
            role: Set(registration.role),
            department: Set(Some(registration.department.clone())),
            status: Set(UserStatus::Active),
            manager_id: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .context("Failed to create user from registration")?;

        let mut active: pending_registrations::ActiveModel = registration.into();
        active.status = Set(RegistrationStatus::Approved);
        active.processed_at = Set(Some(now));
        active.processed_by = Set(Some(approved_by));
        active
            .update(&txn)
            .await
            .context("Failed to mark registration approved")?;

        txn.commit()
            .await
            .context("Failed to commit approval transaction")?;

        Ok(user)
    }

    pub async fn reject(
        &self,
        registration: pending_registrations::Model,
        rejected_by: i32,
        reason: Option<&str>,
    ) -> Result<()> {
        let mut active: pending_registrations::ActiveModel = registration.into();
        active.status = Set(RegistrationStatus::Rejected);
        active.processed_at = Set(Some(chrono::Utc::now()));
        active.processed_by = Set(Some(rejected_by));
        active.rejection_reason = Set(reason.map(str::to_string));
        active
            .update(&self.conn)
            .await
            .context("Failed to mark registration rejected")?;

        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let res = pending_registrations::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete registration")?;

        Ok(res.rows_affected > 0)
    }
}
