//! Domain service for the user directory.
//!
//! Profile lookups, department listings, and admin-side account
//! administration (deactivation, manager assignment).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::enums::{Role, UserStatus};
use crate::entities::users;
use crate::services::CurrentUser;

/// Errors specific to directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User not found")]
    UserNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DirectoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DirectoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Mutable account fields. `None` leaves a field untouched; setting
/// `manager_id` checks the reporting chain for cycles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub manager_id: Option<i32>,
}

/// Public profile view; never exposes the password hash or token.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub status: UserStatus,
    pub manager_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserProfile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department,
            status: user.status,
            manager_id: user.manager_id,
            created_at: user.created_at,
        }
    }
}

/// Domain service trait for the user directory.
#[async_trait::async_trait]
pub trait DirectoryService: Send + Sync {
    /// The caller's own profile.
    async fn me(&self, caller: &CurrentUser) -> Result<UserProfile, DirectoryError>;

    /// One user's profile. Managers and admins only.
    async fn get_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
    ) -> Result<UserProfile, DirectoryError>;

    /// Everyone in the directory. Managers and admins only.
    async fn list_users(&self, caller: &CurrentUser) -> Result<Vec<UserProfile>, DirectoryError>;

    /// Everyone in one department. Managers and admins only.
    async fn list_department(
        &self,
        caller: &CurrentUser,
        department: &str,
    ) -> Result<Vec<UserProfile>, DirectoryError>;

    /// Users reporting to the given manager. Managers and admins only.
    async fn list_reports(
        &self,
        caller: &CurrentUser,
        manager_id: i32,
    ) -> Result<Vec<UserProfile>, DirectoryError>;

    /// Activates or deactivates an account. Admins only; deactivation also
    /// revokes the bearer token.
    async fn set_status(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        status: UserStatus,
    ) -> Result<UserProfile, DirectoryError>;

    /// Edits an account. Admins only. Manager assignment rejects
    /// self-reference and cycles through the reporting chain.
    async fn update_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, DirectoryError>;
}
