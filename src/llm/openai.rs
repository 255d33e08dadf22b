//! OpenAI-compatible chat completion and embedding client.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CofounderError;

use super::{ChatMessage, ChatModel, Embedder};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Request knobs for the client.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for `/chat/completions`, `/embeddings` and `/models`.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, settings: OpenAiSettings) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            settings,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CofounderError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CofounderError::upstream("openai", e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CofounderError::upstream(
                "openai",
                format!("{} {}", status, body.trim()),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| CofounderError::upstream("openai", e))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CofounderError> {
        let request = CompletionRequest {
            model: &self.settings.chat_model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        debug!(
            "chat completion: model={} messages={}",
            request.model,
            messages.len()
        );
        let response: CompletionResponse = self.post("chat/completions", &request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn health(&self) -> Result<(), CofounderError> {
        let response = self
            .http
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| CofounderError::upstream("openai", e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(CofounderError::upstream("openai", response.status()))
        }
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CofounderError> {
        let request = EmbeddingRequest {
            model: &self.settings.embedding_model,
            input: text,
        };
        let response: EmbeddingResponse = self.post("embeddings", &request).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| CofounderError::upstream("openai", "empty embedding response"))
    }
}
