//! A chat model that always answers the same way.
//!
//! Stands in for a real service in tests.

use async_trait::async_trait;

use crate::error::CofounderError;

use super::{ChatMessage, ChatModel, Embedder};

#[derive(Debug, Clone)]
pub struct FixedChatModel {
    response: Result<String, String>,
    embedding: Vec<f32>,
}

impl FixedChatModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            embedding: vec![1.0, 0.0],
        }
    }

    /// A model whose every call fails with an upstream error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            embedding: Vec::new(),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

#[async_trait]
impl ChatModel for FixedChatModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CofounderError> {
        self.response
            .clone()
            .map_err(|e| CofounderError::upstream("fixed", e))
    }

    async fn health(&self) -> Result<(), CofounderError> {
        self.response
            .as_ref()
            .map(|_| ())
            .map_err(|e| CofounderError::upstream("fixed", e))
    }
}

#[async_trait]
impl Embedder for FixedChatModel {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, CofounderError> {
        match &self.response {
            Ok(_) => Ok(self.embedding.clone()),
            Err(e) => Err(CofounderError::upstream("fixed", e)),
        }
    }
}
