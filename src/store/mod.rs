//! # Storage
//!
//! Persistence collaborators for shapes and user profiles.
//!
//! Two backends are provided:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`MemoryBackend`] | Local development, CLI, tests |
//! | [`SupabaseBackend`] | Hosted PostgREST tables `canvas_objects` and `users` |
//!
//! Both are constructed explicitly and handed to the server state; nothing
//! here is a process-wide singleton.

mod memory;
mod supabase;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CofounderError;
use crate::shape::{ShapeRecord, StoredShape};

/// Shape persistence.
#[async_trait]
pub trait ShapeStore: Send + Sync {
    /// Persist one record, assigning its id and creation time.
    async fn save(&self, record: ShapeRecord) -> Result<StoredShape, CofounderError>;

    /// All shapes of one owner, oldest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<StoredShape>, CofounderError>;

    /// Delete one shape of `owner_id`. Returns false when nothing matched.
    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, CofounderError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), CofounderError>;
}

/// Profile row created after a successful sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// User profile persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, CofounderError>;
}
