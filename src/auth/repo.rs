use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    error::StoreError,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a user. Fails with [`StoreError::EmailTaken`] if the email exists.
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;

    async fn count(&self) -> anyhow::Result<usize>;
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::EmailTaken);
        }
        let user = User::from_new(new, OffsetDateTime::now_utc());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.users.read().await.len())
    }
}
