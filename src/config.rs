//! Server configuration, resolved from command-line flags and environment.

use clap::Args;

use crate::auth::AuthMode;
use crate::llm::OpenAiSettings;

/// Server configuration.
///
/// Every field can be given as a flag or through its environment variable.
/// Collaborators that are not configured fall back to in-memory versions
/// (store, auth, index) or to canned replies (chat).
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[arg(long = "listen", env = "COFOUNDER_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service role key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// OpenAI API key; without it chat answers with a canned reply
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = crate::llm::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Chat completion model
    #[arg(long, env = "OPENAI_MODEL", default_value = crate::llm::DEFAULT_CHAT_MODEL)]
    pub openai_model: String,

    /// Embedding model used for idea search
    #[arg(long, env = "OPENAI_EMBEDDING_MODEL", default_value = crate::llm::DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Pinecone index host
    #[arg(long, env = "PINECONE_HOST")]
    pub pinecone_host: Option<String>,

    /// Pinecone API key
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: Option<String>,

    /// How callers are authenticated
    #[arg(long, env = "COFOUNDER_AUTH_MODE", value_enum, default_value_t = AuthMode::Demo)]
    pub auth_mode: AuthMode,

    /// Shared bearer token accepted in demo auth mode
    #[arg(long, env = "COFOUNDER_DEMO_TOKEN", default_value = "demo-token", hide_env_values = true)]
    pub demo_token: String,

    /// Embed and index each chat exchange in the background
    #[arg(long, env = "COFOUNDER_INDEX_CONVERSATIONS")]
    pub index_conversations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let openai = OpenAiSettings::default();
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            supabase_url: None,
            supabase_key: None,
            openai_api_key: None,
            openai_base_url: openai.base_url,
            openai_model: openai.chat_model,
            embedding_model: openai.embedding_model,
            pinecone_host: None,
            pinecone_api_key: None,
            auth_mode: AuthMode::Demo,
            demo_token: "demo-token".to_string(),
            index_conversations: false,
        }
    }
}

impl ServerConfig {
    pub fn openai_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.openai_base_url.clone(),
            chat_model: self.openai_model.clone(),
            embedding_model: self.embedding_model.clone(),
            ..OpenAiSettings::default()
        }
    }

    /// One-line summary safe for logs: secrets appear only as set/unset.
    pub fn describe(&self) -> String {
        format!(
            "listen={} supabase={} openai={} (model={}) pinecone={} auth={:?} index_conversations={}",
            self.listen_addr,
            self.supabase_url.is_some(),
            self.openai_api_key.is_some(),
            self.openai_model,
            self.pinecone_host.is_some(),
            self.auth_mode,
            self.index_conversations
        )
    }
}
