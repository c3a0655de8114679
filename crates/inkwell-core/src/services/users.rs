use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::cleanup::purge;
use super::images::ImageUpload;
use crate::domain::{Credentials, ProfileUpdate, User};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, ObjectStore, PasswordService, UserRepository};

/// Account, profile and preference use cases.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    passwords: Arc<dyn PasswordService>,
    store: Arc<dyn ObjectStore>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        passwords: Arc<dyn PasswordService>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            users,
            categories,
            passwords,
            store,
        }
    }

    pub async fn register(&self, credentials: Credentials) -> Result<User, DomainError> {
        let credentials = credentials.validate()?;

        if self.users.find_by_login(&credentials.login).await?.is_some() {
            return Err(DomainError::Duplicate("User already exists".into()));
        }

        let password_hash = self
            .passwords
            .hash(&credentials.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let saved = self
            .users
            .save(User::new(credentials.login, password_hash))
            .await?;
        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Unknown login and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_login(login.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(user_id).await?;
        update.apply(&mut user, Utc::now());
        Ok(self.users.save(user).await?)
    }

    /// Store a new avatar; the previous one is removed best-effort.
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        upload: ImageUpload,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(user_id).await?;
        upload.validate()?;

        let now = Utc::now();
        let key = upload.object_key(&format!("avatars/{user_id}/"), now);
        let url = self
            .store
            .put(&key, upload.bytes, &upload.content_type)
            .await
            .map_err(|e| DomainError::DependencyUnavailable(e.to_string()))?;

        let previous = std::mem::replace(&mut user.avatar_url, url.clone());
        user.updated_at = now;
        let saved = match self.users.save(user).await {
            Ok(saved) => saved,
            Err(e) => {
                purge(self.store.as_ref(), &[url], "avatar_rollback").await;
                return Err(e.into());
            }
        };

        if !previous.is_empty() {
            purge(self.store.as_ref(), &[previous], "avatar_replace").await;
        }
        Ok(saved)
    }

    pub async fn preferences(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self.profile(user_id).await?.preferred_categories)
    }

    /// Replace preferred categories. Malformed ids are rejected, unknown ones dropped.
    pub async fn set_preferences(
        &self,
        user_id: Uuid,
        raw_ids: &[String],
    ) -> Result<Vec<Uuid>, DomainError> {
        let mut ids = Vec::with_capacity(raw_ids.len());
        for raw in raw_ids {
            let id = Uuid::parse_str(raw.trim()).map_err(|_| {
                DomainError::invalid("categoryIds", "categoryIds must be an array of valid ids")
            })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        let ids = if ids.is_empty() {
            ids
        } else {
            self.categories.existing_ids(&ids).await?
        };
        self.store_preferences(user_id, ids).await
    }

    pub async fn reset_preferences(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        self.store_preferences(user_id, Vec::new()).await
    }

    async fn store_preferences(
        &self,
        user_id: Uuid,
        ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, DomainError> {
        let mut user = self.profile(user_id).await?;
        user.preferred_categories = ids;
        user.updated_at = Utc::now();
        Ok(self.users.save(user).await?.preferred_categories)
    }
}
