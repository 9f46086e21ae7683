use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::{NewUser, UserProfile, UserRepo},
};

/// Process-local user store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<Uuid, UserProfile>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserProfile>) -> Self {
        let map = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: RwLock::new(map),
        }
    }

    /// Removes a user, as an account deletion would.
    pub async fn delete(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserProfile> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists);
        }

        let now = Utc::now();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(profile.id, profile.clone());
        Ok(profile)
    }
}
