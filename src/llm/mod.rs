//! # Language Model Collaborators
//!
//! Chat completion and text embedding behind two small traits, with an
//! OpenAI-compatible HTTP client and a fixed in-process model.

mod fixed;
mod openai;
pub mod prompt;

pub use fixed::FixedChatModel;
pub use openai::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL, OpenAiClient, OpenAiSettings,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CofounderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete the conversation; returns the assistant's raw text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CofounderError>;

    /// Cheap call proving the service is reachable and the key is valid.
    async fn health(&self) -> Result<(), CofounderError>;
}

/// Text embedding service.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CofounderError>;
}
