//! Domain service for authentication.
//!
//! Login verifies the Argon2id hash and mints a fresh bearer token; logout
//! revokes it. Every other endpoint resolves the token through the auth
//! middleware.

use serde::Serialize;
use thiserror::Error;

use crate::entities::enums::Role;
use crate::services::CurrentUser;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result containing the minted bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user_id: i32,
    pub name: String,
    pub role: Role,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a bad email or password
    /// and [`AuthError::Inactive`] for deactivated accounts.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Revokes the caller's bearer token.
    async fn logout(&self, caller: &CurrentUser) -> Result<(), AuthError>;

    /// Resolves a bearer token to its user, if any.
    async fn resolve_token(&self, token: &str) -> Result<Option<CurrentUser>, AuthError>;

    /// Changes the caller's password after verifying the current one.
    async fn change_password(
        &self,
        caller: &CurrentUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
