//! `SeaORM` implementation of the `RegistrationService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::db::{Store, hash_password};
use crate::entities::enums::{RegistrationStatus, Role};
use crate::entities::{pending_registrations, users};
use crate::services::CurrentUser;
use crate::services::notification_service::NotificationService;
use crate::services::registration_service::{
    ApplyRequest, RegistrationError, RegistrationService,
};
use std::sync::Arc;

pub struct SeaOrmRegistrationService {
    store: Store,
    notifier: Arc<dyn NotificationService>,
}

impl SeaOrmRegistrationService {
    #[must_use]
    pub fn new(store: Store, notifier: Arc<dyn NotificationService>) -> Self {
        Self { store, notifier }
    }

    async fn load_pending(
        &self,
        id: i32,
    ) -> Result<pending_registrations::Model, RegistrationError> {
        let registration = self
            .store
            .get_registration(id)
            .await?
            .ok_or(RegistrationError::NotFound)?;

        if registration.status != RegistrationStatus::Pending {
            return Err(RegistrationError::AlreadyProcessed);
        }

        Ok(registration)
    }
}

fn require_admin(caller: &CurrentUser) -> Result<(), RegistrationError> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(RegistrationError::Forbidden(
            "Admin role required".to_string(),
        ))
    }
}

fn validate(req: &ApplyRequest) -> Result<(), RegistrationError> {
    if req.name.trim().is_empty() {
        return Err(RegistrationError::Validation(
            "Name must not be empty".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(RegistrationError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(RegistrationError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    // Admin accounts are provisioned by an existing admin, never self-served
    if req.role == Role::Admin {
        return Err(RegistrationError::Validation(
            "Cannot apply for an admin account".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl RegistrationService for SeaOrmRegistrationService {
    async fn apply(
        &self,
        req: ApplyRequest,
    ) -> Result<pending_registrations::Model, RegistrationError> {
        validate(&req)?;

        if self.store.get_user_by_email(&req.email).await?.is_some() {
            return Err(RegistrationError::EmailTaken);
        }
        if self
            .store
            .get_pending_registration_by_email(&req.email)
            .await?
            .is_some()
        {
            return Err(RegistrationError::AlreadyApplied);
        }

        let password = req.password.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))??;

        let registration = self
            .store
            .create_registration(
                &req.name,
                &req.email,
                &password_hash,
                req.role,
                &req.department,
            )
            .await?;

        Ok(registration)
    }

    async fn list_pending(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError> {
        require_admin(caller)?;
        Ok(self.store.list_pending_registrations().await?)
    }

    async fn list_all(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError> {
        require_admin(caller)?;
        Ok(self.store.list_all_registrations().await?)
    }

    async fn list_by_status(
        &self,
        caller: &CurrentUser,
        status: RegistrationStatus,
    ) -> Result<Vec<pending_registrations::Model>, RegistrationError> {
        require_admin(caller)?;
        Ok(self.store.list_registrations_by_status(status).await?)
    }

    async fn pending_count(&self, caller: &CurrentUser) -> Result<u64, RegistrationError> {
        require_admin(caller)?;
        Ok(self.store.pending_registration_count().await?)
    }

    async fn approve(
        &self,
        caller: &CurrentUser,
        id: i32,
    ) -> Result<users::Model, RegistrationError> {
        require_admin(caller)?;
        let registration = self.load_pending(id).await?;

        let user = self
            .store
            .approve_registration(registration, caller.id)
            .await?;

        let message = format!(
            "Welcome, {}! Your account has been approved and is ready to use.",
            user.name
        );
        if let Err(err) = self.notifier.notify(user.id, "Welcome", &message).await {
            tracing::warn!("Failed to send welcome notification to user {}: {err}", user.id);
        }

        Ok(user)
    }

    async fn reject(
        &self,
        caller: &CurrentUser,
        id: i32,
        reason: Option<String>,
    ) -> Result<(), RegistrationError> {
        require_admin(caller)?;
        let registration = self.load_pending(id).await?;

        self.store
            .reject_registration(registration, caller.id, reason.as_deref())
            .await?;

        Ok(())
    }

    async fn delete(&self, caller: &CurrentUser, id: i32) -> Result<(), RegistrationError> {
        require_admin(caller)?;

        if !self.store.delete_registration(id).await? {
            return Err(RegistrationError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::entities::enums::Role;
    use crate::services::registration_service::{ApplyRequest, RegistrationError};

    fn req() -> ApplyRequest {
        ApplyRequest {
            name: "Dana Vega".to_string(),
            email: "dana@example.com".to_string(),
            password: "correct-horse".to_string(),
            role: Role::Employee,
            department: "Engineering".to_string(),
        }
    }

    #[test]
    fn valid_application_passes() {
        assert!(validate(&req()).is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut r = req();
        r.password = "short".to_string();
        assert!(matches!(
            validate(&r),
            Err(RegistrationError::Validation(_))
        ));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut r = req();
        r.email = "not-an-email".to_string();
        assert!(matches!(
            validate(&r),
            Err(RegistrationError::Validation(_))
        ));
    }

    #[test]
    fn admin_role_cannot_be_requested() {
        let mut r = req();
        r.role = Role::Admin;
        assert!(matches!(
            validate(&r),
            Err(RegistrationError::Validation(_))
        ));
    }
}
