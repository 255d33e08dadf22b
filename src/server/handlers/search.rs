//! Idea search handler.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CofounderError;
use crate::search::SearchResult;

use super::super::state::AppState;
use super::ErrorResponse;

/// Upper bound on `limit`.
const MAX_LIMIT: usize = 50;

fn default_limit() -> usize {
    5
}

/// Request body for POST /api/search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Only honored by demo authentication.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<SearchResult>,
}

/// Handle POST /api/search - nearest past ideas of the caller.
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(CofounderError::InvalidRequest("Query is required".to_string()).into());
    }

    let user_id = state
        .auth
        .authenticate(&headers, req.user_id.as_deref())
        .await?;

    let embedder = state.services.embedder.as_ref().ok_or_else(|| {
        CofounderError::Config("Search is not available: no embedding model configured".to_string())
    })?;

    let vector = embedder.embed(query).await?;
    let limit = req.limit.clamp(1, MAX_LIMIT);
    let matches = state
        .services
        .index
        .query(&vector, limit, &user_id)
        .await?;

    Ok(Json(SearchResponse {
        success: true,
        results: matches.into_iter().map(SearchResult::from).collect(),
    }))
}
