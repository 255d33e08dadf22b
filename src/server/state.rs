//! Server state and the collaborators it is built from.

use log::info;
use std::sync::Arc;

use crate::auth::{AuthProvider, AuthStrategy};
use crate::config::ServerConfig;
use crate::error::CofounderError;
use crate::llm::{ChatModel, Embedder, OpenAiClient};
use crate::search::{MemoryIndex, PineconeIndex, VectorIndex};
use crate::store::{MemoryBackend, ShapeStore, SupabaseBackend, UserStore};
use crate::tasks::TaskQueue;

/// External services the handlers talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub shapes: Arc<dyn ShapeStore>,
    pub users: Arc<dyn UserStore>,
    pub auth: Arc<dyn AuthProvider>,
    /// `None` when no chat model is configured.
    pub chat: Option<Arc<dyn ChatModel>>,
    /// `None` when no embedding model is configured.
    pub embedder: Option<Arc<dyn Embedder>>,
    pub index: Arc<dyn VectorIndex>,
}

impl Collaborators {
    /// In-memory store, auth and index; no chat model.
    pub fn in_memory(backend: Arc<MemoryBackend>) -> Self {
        Self {
            shapes: backend.clone(),
            users: backend.clone(),
            auth: backend,
            chat: None,
            embedder: None,
            index: Arc::new(MemoryIndex::new()),
        }
    }

    /// Use `model` for both chat completion and embeddings.
    pub fn with_model<M>(mut self, model: Arc<M>) -> Self
    where
        M: ChatModel + Embedder + 'static,
    {
        self.chat = Some(model.clone() as Arc<dyn ChatModel>);
        self.embedder = Some(model as Arc<dyn Embedder>);
        self
    }

    pub fn with_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = index;
        self
    }

    /// Build real clients for whatever the configuration names.
    pub fn from_config(config: &ServerConfig) -> Result<Self, CofounderError> {
        let http = reqwest::Client::builder()
            .user_agent("cofounder/0.1")
            .build()
            .map_err(|e| CofounderError::Config(format!("HTTP client error: {}", e)))?;

        let mut collaborators = match (&config.supabase_url, &config.supabase_key) {
            (Some(url), Some(key)) => {
                info!("using Supabase backend");
                let backend = Arc::new(SupabaseBackend::new(http.clone(), url, key));
                Self {
                    shapes: backend.clone(),
                    users: backend.clone(),
                    auth: backend,
                    chat: None,
                    embedder: None,
                    index: Arc::new(MemoryIndex::new()),
                }
            }
            (None, None) => {
                info!("no Supabase configured, using in-memory backend");
                Self::in_memory(Arc::new(MemoryBackend::new()))
            }
            _ => {
                return Err(CofounderError::Config(
                    "Supabase URL and service key must be set together".to_string(),
                ));
            }
        };

        if let Some(key) = &config.openai_api_key {
            let client = OpenAiClient::new(http.clone(), key, config.openai_settings());
            collaborators = collaborators.with_model(Arc::new(client));
        } else {
            info!("no OpenAI key configured, chat will answer with canned replies");
        }

        match (&config.pinecone_host, &config.pinecone_api_key) {
            (Some(host), Some(key)) => {
                collaborators =
                    collaborators.with_index(Arc::new(PineconeIndex::new(http, host, key)));
            }
            (None, None) => info!("no Pinecone configured, using in-memory index"),
            _ => {
                return Err(CofounderError::Config(
                    "Pinecone host and API key must be set together".to_string(),
                ));
            }
        }

        Ok(collaborators)
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub services: Collaborators,
    pub auth: AuthStrategy,
    pub tasks: TaskQueue,
}

impl AppState {
    pub fn new(config: ServerConfig, services: Collaborators, tasks: TaskQueue) -> Self {
        let auth = AuthStrategy::from_mode(
            config.auth_mode,
            config.demo_token.clone(),
            services.auth.clone(),
        );
        Self {
            config,
            services,
            auth,
            tasks,
        }
    }
}
