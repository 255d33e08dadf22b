//! # Idea Search
//!
//! Past exchanges are embedded and kept in a vector index so users can find
//! earlier ideas by meaning. Matches are always filtered by owner.

mod memory;
mod pinecone;

pub use memory::MemoryIndex;
pub use pinecone::PineconeIndex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CofounderError;

/// Metadata stored next to each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaMetadata {
    pub user_id: String,
    /// What the user wrote.
    pub content: String,
    /// What the assistant answered.
    pub response: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: IdeaMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<IdeaMetadata>,
}

/// Result row returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub content: Option<String>,
    pub response: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<SearchMatch> for SearchResult {
    fn from(m: SearchMatch) -> Self {
        let (content, response, timestamp) = match m.metadata {
            Some(meta) => (Some(meta.content), Some(meta.response), Some(meta.timestamp)),
            None => (None, None, None),
        };
        Self {
            id: m.id,
            score: m.score,
            content,
            response,
            timestamp,
        }
    }
}

/// Vector index collaborator.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), CofounderError>;

    /// Nearest `top_k` vectors belonging to `user_id`, best first.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        user_id: &str,
    ) -> Result<Vec<SearchMatch>, CofounderError>;

    async fn health(&self) -> Result<(), CofounderError>;
}
