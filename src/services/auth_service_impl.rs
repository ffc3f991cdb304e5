//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::db::{Store, generate_token, verify_password};
use crate::entities::enums::UserStatus;
use crate::services::CurrentUser;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Argon2 verification is CPU-bound; run it off the async runtime.
async fn verify_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(AuthError::from)
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some(user) = self.store.get_user_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            return Err(AuthError::Inactive);
        }

        let token = generate_token();
        let result = LoginResult {
            token: token.clone(),
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        };
        self.store.set_user_token(user, Some(token)).await?;

        Ok(result)
    }

    async fn logout(&self, caller: &CurrentUser) -> Result<(), AuthError> {
        let user = self
            .store
            .get_user(caller.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.store.set_user_token(user, None).await?;
        Ok(())
    }

    async fn resolve_token(&self, token: &str) -> Result<Option<CurrentUser>, AuthError> {
        let user = self.store.get_user_by_token(token).await?;

        Ok(user
            .filter(|u| u.status == UserStatus::Active)
            .map(|u| CurrentUser {
                id: u.id,
                name: u.name,
                role: u.role,
            }))
    }

    async fn change_password(
        &self,
        caller: &CurrentUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < 8 {
            return Err(AuthError::Validation(
                "New password must be at least 8 characters".to_string(),
            ));
        }
        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(caller.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_blocking(current_password.to_string(), user.password_hash.clone()).await? {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store.update_user_password(user, new_password).await?;
        Ok(())
    }
}
