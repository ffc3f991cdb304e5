use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tokio::task;

use crate::entities::enums::{Role, UserStatus};
use crate::entities::users;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    /// Resolve a bearer token to its user. Tokens are unique by construction
    /// (64 random hex chars), so `one` is safe.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::ApiToken.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query user by token")
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn list_by_department(&self, department: &str) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Department.eq(department))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list users by department")
    }

    pub async fn list_by_manager(&self, manager_id: i32) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .filter(users::Column::ManagerId.eq(manager_id))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list direct reports")
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        department: Option<&str>,
        manager_id: Option<i32>,
    ) -> Result<users::Model> {
        let active = users::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            api_token: Set(None),
            role: Set(role),
            department: Set(department.map(str::to_string)),
            status: Set(UserStatus::Active),
            manager_id: Set(manager_id),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")
    }

    pub async fn update(&self, active: users::ActiveModel) -> Result<users::Model> {
        active
            .update(&self.conn)
            .await
            .context("Failed to update user")
    }

    pub async fn set_token(&self, user: users::Model, token: Option<String>) -> Result<()> {
        let mut active: users::ActiveModel = user.into();
        active.api_token = Set(token);
        active.updated_at = Set(Some(chrono::Utc::now()));
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn set_status(&self, user: users::Model, status: UserStatus) -> Result<()> {
        let mut active: users::ActiveModel = user.into();
        active.status = Set(status);
        active.updated_at = Set(Some(chrono::Utc::now()));
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn update_password(&self, user: users::Model, new_password: &str) -> Result<()> {
        let password = new_password.to_string();
        let new_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(Some(chrono::Utc::now()));
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against an Argon2id hash.
/// CPU-intensive; callers run this through `spawn_blocking`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a random bearer token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
