//! Chat handler: assistant reply plus canvas shapes.

use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;
use futures_util::FutureExt;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::CofounderError;
use crate::llm::prompt::{self, HistoryEntry};
use crate::reply::process_assistant_reply;
use crate::search::{IdeaMetadata, VectorRecord};
use crate::shape::StoredShape;

use super::super::state::AppState;
use super::ErrorResponse;

fn default_project() -> String {
    "default".to_string()
}

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    #[serde(default = "default_project")]
    pub project_id: String,
    /// Only honored by demo authentication.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body for POST /api/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Assistant text with canvas directives removed.
    pub response: String,
    pub canvas_objects: Vec<StoredShape>,
    /// False when the reply is a canned fallback.
    pub success: bool,
}

/// Handle POST /api/chat.
///
/// Model failures do not fail the request: the caller gets a canned reply
/// with `success: false`, and drawing requests still produce shapes.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ErrorResponse> {
    let user_id = state
        .auth
        .authenticate(&headers, req.user_id.as_deref())
        .await?;

    let message = req.message.trim();
    if message.is_empty() {
        return Err(CofounderError::InvalidRequest("Message is required".to_string()).into());
    }

    let (raw_reply, success) = match &state.services.chat {
        None => (prompt::UNCONFIGURED_REPLY.to_string(), false),
        Some(model) => {
            let messages = prompt::build_messages(&req.conversation_history, message);
            match model.complete(&messages).await {
                Ok(text) if text.trim().is_empty() => (prompt::EMPTY_REPLY.to_string(), true),
                Ok(text) => (text, true),
                Err(e) => {
                    error!("chat completion failed for {}: {}", user_id, e);
                    (prompt::ERROR_REPLY.to_string(), false)
                }
            }
        }
    };

    let processed = process_assistant_reply(
        state.services.shapes.as_ref(),
        &raw_reply,
        &user_id,
        Some(message),
    )
    .await;

    if success && state.config.index_conversations {
        queue_indexing(&state, &user_id, &req.project_id, message, &processed.display_text);
    }

    debug!(
        "chat for {} (project {}): {} shape(s), success={}",
        user_id,
        req.project_id,
        processed.created_shapes.len(),
        success
    );

    Ok(Json(ChatResponse {
        response: processed.display_text,
        canvas_objects: processed.created_shapes,
        success,
    }))
}

/// Embed the exchange and upsert it into the vector index in the background.
fn queue_indexing(state: &AppState, user_id: &str, project_id: &str, message: &str, reply: &str) {
    let Some(embedder) = state.services.embedder.clone() else {
        debug!("conversation indexing enabled but no embedder configured");
        return;
    };
    let index = state.services.index.clone();
    let metadata = IdeaMetadata {
        user_id: user_id.to_string(),
        content: message.to_string(),
        response: reply.to_string(),
        project_id: Some(project_id.to_string()),
        timestamp: Utc::now(),
    };

    let queued = state.tasks.submit(
        "index-conversation",
        async move {
            let text = format!("{}\n\n{}", metadata.content, metadata.response);
            let values = embedder.embed(&text).await?;
            let id = Uuid::new_v4().to_string();
            index
                .upsert(vec![VectorRecord {
                    id: id.clone(),
                    values,
                    metadata,
                }])
                .await?;
            info!("indexed conversation {}", id);
            Ok::<_, CofounderError>(())
        }
        .boxed(),
    );
    if !queued {
        debug!("conversation for {} not indexed", user_id);
    }
}
