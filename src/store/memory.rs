//! In-process backend for shapes, profiles and accounts.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{AuthProvider, AuthUser};
use crate::error::CofounderError;
use crate::shape::{ShapeRecord, StoredShape};

use super::{NewUser, ShapeStore, UserProfile, UserStore};

struct Account {
    user: AuthUser,
    password: String,
}

#[derive(Default)]
struct Inner {
    shapes: Vec<StoredShape>,
    next_id: i64,
    users: HashMap<String, UserProfile>,
    /// Keyed by lowercased email.
    accounts: HashMap<String, Account>,
    /// Access token -> user id.
    tokens: HashMap<String, String>,
}

/// Backend keeping everything in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue an access token for an existing account.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, CofounderError> {
        let mut inner = self.inner.write().await;
        let user_id = match inner.accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => account.user.id.clone(),
            _ => return Err(CofounderError::Auth("Invalid login credentials".to_string())),
        };
        let token = Uuid::new_v4().to_string();
        inner.tokens.insert(token.clone(), user_id);
        Ok(token)
    }
}

#[async_trait]
impl ShapeStore for MemoryBackend {
    async fn save(&self, record: ShapeRecord) -> Result<StoredShape, CofounderError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let stored = StoredShape {
            id: inner.next_id,
            shape: record.shape,
            owner_id: record.owner_id,
            created_at: Utc::now(),
        };
        inner.shapes.push(stored.clone());
        debug!("stored {} #{} for {}", stored.shape.shape_type(), stored.id, stored.owner_id);
        Ok(stored)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<StoredShape>, CofounderError> {
        let inner = self.inner.read().await;
        // Insertion order is creation order.
        Ok(inner
            .shapes
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, CofounderError> {
        let mut inner = self.inner.write().await;
        let before = inner.shapes.len();
        inner
            .shapes
            .retain(|s| !(s.id == id && s.owner_id == owner_id));
        Ok(inner.shapes.len() != before)
    }

    async fn ping(&self) -> Result<(), CofounderError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, CofounderError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.id) {
            return Err(CofounderError::Storage(format!(
                "user {} already exists",
                user.id
            )));
        }
        let now = Utc::now();
        let profile = UserProfile {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, CofounderError> {
        let mut inner = self.inner.write().await;
        let key = email.to_lowercase();
        if inner.accounts.contains_key(&key) {
            return Err(CofounderError::Auth("User already registered".to_string()));
        }
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        inner.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    async fn verify_token(&self, token: &str) -> Result<AuthUser, CofounderError> {
        let inner = self.inner.read().await;
        let user_id = inner
            .tokens
            .get(token)
            .ok_or_else(|| CofounderError::Auth("Invalid token".to_string()))?;
        inner
            .accounts
            .values()
            .find(|a| &a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| CofounderError::Auth("Invalid token".to_string()))
    }
}
