//! Canvas handlers: listing and deleting stored shapes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::shape::StoredShape;

use super::super::state::AppState;
use super::{ErrorResponse, api_error};

/// Query parameters shared by the canvas routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasQuery {
    /// Only honored by demo authentication.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: i64,
}

/// GET /api/canvas - The caller's shapes, oldest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CanvasQuery>,
) -> Result<Json<Vec<StoredShape>>, ErrorResponse> {
    let user_id = state
        .auth
        .authenticate(&headers, query.user_id.as_deref())
        .await?;
    let shapes = state.services.shapes.list_by_owner(&user_id).await?;
    Ok(Json(shapes))
}

/// DELETE /api/canvas/:id - Remove one of the caller's shapes.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<CanvasQuery>,
) -> Result<Json<DeleteResponse>, ErrorResponse> {
    let user_id = state
        .auth
        .authenticate(&headers, query.user_id.as_deref())
        .await?;
    if !state.services.shapes.delete(&user_id, id).await? {
        return Err(api_error(StatusCode::NOT_FOUND, format!("Canvas object {} not found", id)).into());
    }
    Ok(Json(DeleteResponse { success: true, id }))
}
