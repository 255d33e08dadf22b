//! Account registration handler.

use axum::{Json, extract::State, http::StatusCode};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::CofounderError;
use crate::store::NewUser;

use super::super::state::AppState;
use super::{ErrorResponse, api_error};

/// Request body for POST /api/auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: AuthUser,
}

/// Handle POST /api/auth/register - sign up, then create the profile row.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ErrorResponse> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(CofounderError::InvalidRequest(
            "Email and password are required".to_string(),
        )
        .into());
    }

    let user = match state.services.auth.sign_up(email, &req.password).await {
        Ok(user) => user,
        // Provider rejections (duplicate email, weak password) go back as-is.
        Err(CofounderError::Auth(msg)) => return Err(api_error(StatusCode::BAD_REQUEST, msg).into()),
        Err(e) => return Err(e.into()),
    };

    let profile = NewUser {
        id: user.id.clone(),
        email: user.email.clone().unwrap_or_else(|| email.to_string()),
        name: req.name.filter(|n| !n.trim().is_empty()),
    };
    if let Err(e) = state.services.users.create_user(profile).await {
        error!("profile creation failed for {}: {}", user.id, e);
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create user profile",
        )
        .into());
    }

    info!("registered user {}", user.id);
    Ok(Json(RegisterResponse {
        success: true,
        message: "User registered successfully".to_string(),
        user,
    }))
}
