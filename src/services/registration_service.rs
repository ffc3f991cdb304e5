//! Domain service for the self-service registration workflow.
//!
//! Applicants queue up as pending registrations; an admin either approves
//! (which creates the account) or rejects. Processed applications stay on
//! record until explicitly deleted.

use serde::Deserialize;
use thiserror::Error;

use crate::entities::enums::{RegistrationStatus, Role};
use crate::entities::{pending_registrations, users};
use crate::services::CurrentUser;

/// Errors specific to registration operations.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Registration not found")]
    NotFound,

    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("A pending registration already exists for this email")]
    AlreadyApplied,

    #[error("Registration has already been processed")]
    AlreadyProcessed,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RegistrationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RegistrationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub department: String,
}

const fn default_role() -> Role {
    Role::Employee
}

/// Domain service trait for registrations.
#[async_trait::async_trait]
pub trait RegistrationService: Send + Sync {
    /// Files a new application. Unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EmailTaken`] if an account already uses
    /// the email, or [`RegistrationError::AlreadyApplied`] if a pending
    /// application does.
    async fn apply(&self, req: ApplyRequest)
    -> Result<pending_registrations::Model, RegistrationError>;

    /// Applications still awaiting a decision. Admins only.
    async fn list_pending(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError>;

    /// Every application regardless of status. Admins only.
    async fn list_all(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError>;

    /// Applications in one lifecycle state. Admins only.
    async fn list_by_status(
        &self,
        caller: &CurrentUser,
        status: RegistrationStatus,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError>;

    /// Number of applications still awaiting a decision. Admins only.
    async fn pending_count(&self, caller: &CurrentUser) -> Result<u64, RegistrationError>;

    /// Approves a pending application and creates the account atomically.
    /// Admins only.
    async fn approve(
        &self,
        caller: &CurrentUser,
        id: i32,
    ) -> Result<users::Model, RegistrationError>;

    /// Rejects a pending application with an optional reason. Admins only.
    async fn reject(
        &self,
        caller: &CurrentUser,
        id: i32,
        reason: Option<String>,
    ) -> Result<(), RegistrationError>;

    /// Removes an application record. Admins only.
    async fn delete(&self, caller: &CurrentUser, id: i32) -> Result<(), RegistrationError>;
}
