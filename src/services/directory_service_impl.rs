//! `SeaORM` implementation of the `DirectoryService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::enums::{Role, UserStatus};
use crate::entities::users;
use crate::services::CurrentUser;
use crate::services::directory_service::{
    DirectoryError, DirectoryService, UpdateUserRequest, UserProfile,
};
use sea_orm::Set;
use std::collections::HashSet;

pub struct SeaOrmDirectoryService {
    store: Store,
}

impl SeaOrmDirectoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, user_id: i32) -> Result<users::Model, DirectoryError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(DirectoryError::UserNotFound)
    }

    /// Walks the reporting chain upward from `manager_id`; assigning it to
    /// `user_id` must not close a loop.
    async fn check_manager_chain(
        &self,
        user_id: i32,
        manager_id: i32,
    ) -> Result<(), DirectoryError> {
        if manager_id == user_id {
            return Err(DirectoryError::Validation(
                "A user cannot be their own manager".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut current = Some(manager_id);
        while let Some(id) = current {
            if id == user_id {
                return Err(DirectoryError::Validation(
                    "Manager assignment would create a reporting cycle".to_string(),
                ));
            }
            if !seen.insert(id) {
                break;
            }
            current = self.load(id).await?.manager_id;
        }

        Ok(())
    }
}

fn require_manager(caller: &CurrentUser) -> Result<(), DirectoryError> {
    if caller.role.is_manager_or_admin() {
        Ok(())
    } else {
        Err(DirectoryError::Forbidden(
            "Manager or admin role required".to_string(),
        ))
    }
}

#[async_trait]
impl DirectoryService for SeaOrmDirectoryService {
    async fn me(&self, caller: &CurrentUser) -> Result<UserProfile, DirectoryError> {
        Ok(self.load(caller.id).await?.into())
    }

    async fn get_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
    ) -> Result<UserProfile, DirectoryError> {
        if user_id != caller.id {
            require_manager(caller)?;
        }
        Ok(self.load(user_id).await?.into())
    }

    async fn list_users(&self, caller: &CurrentUser) -> Result<Vec<UserProfile>, DirectoryError> {
        require_manager(caller)?;
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn list_department(
        &self,
        caller: &CurrentUser,
        department: &str,
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        require_manager(caller)?;
        let users = self.store.list_users_by_department(department).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn list_reports(
        &self,
        caller: &CurrentUser,
        manager_id: i32,
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        require_manager(caller)?;
        let users = self.store.list_direct_reports(manager_id).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn set_status(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        status: UserStatus,
    ) -> Result<UserProfile, DirectoryError> {
        if caller.role != Role::Admin {
            return Err(DirectoryError::Forbidden("Admin role required".to_string()));
        }
        if user_id == caller.id {
            return Err(DirectoryError::Validation(
                "Cannot change the status of your own account".to_string(),
            ));
        }

        let user = self.load(user_id).await?;
        self.store.set_user_status(user, status).await?;

        // Revoking the token ends any live session for a deactivated account
        let user = self.load(user_id).await?;
        if status == UserStatus::Inactive && user.api_token.is_some() {
            self.store.set_user_token(user, None).await?;
            return Ok(self.load(user_id).await?.into());
        }

        Ok(user.into())
    }

    async fn update_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, DirectoryError> {
        if caller.role != Role::Admin {
            return Err(DirectoryError::Forbidden("Admin role required".to_string()));
        }
        if req.status.is_some() && user_id == caller.id {
            return Err(DirectoryError::Validation(
                "Cannot change the status of your own account".to_string(),
            ));
        }

        if let Some(name) = &req.name
            && name.trim().is_empty()
        {
            return Err(DirectoryError::Validation(
                "Name must not be empty".to_string(),
            ));
        }
        if let Some(manager_id) = req.manager_id {
            self.check_manager_chain(user_id, manager_id).await?;
        }

        let user = self.load(user_id).await?;
        let deactivating = req.status == Some(UserStatus::Inactive);

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(department) = req.department {
            active.department = Set(Some(department));
        }
        if let Some(role) = req.role {
            active.role = Set(role);
        }
        if let Some(status) = req.status {
            active.status = Set(status);
        }
        if let Some(manager_id) = req.manager_id {
            active.manager_id = Set(Some(manager_id));
        }
        if deactivating {
            active.api_token = Set(None);
        }
        active.updated_at = Set(Some(chrono::Utc::now()));

        Ok(self.store.update_user(active).await?.into())
    }
}
