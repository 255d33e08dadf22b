//! HTTP handlers for the server.

pub mod canvas;
pub mod chat;
pub mod health;
pub mod register;
pub mod search;

use axum::{Json, http::StatusCode};
use log::error;
use serde::Serialize;

use crate::error::CofounderError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Map a crate error onto a status code and a client-safe message.
impl From<CofounderError> for ErrorResponse {
    fn from(err: CofounderError) -> Self {
        ErrorResponse(match err {
            CofounderError::InvalidRequest(msg) => api_error(StatusCode::BAD_REQUEST, msg),
            CofounderError::Auth(msg) => api_error(StatusCode::UNAUTHORIZED, msg),
            CofounderError::Config(msg) => api_error(StatusCode::SERVICE_UNAVAILABLE, msg),
            other => {
                error!("request failed: {}", other);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        })
    }
}

/// Wrapper so `?` converts crate errors inside handlers.
pub struct ErrorResponse(pub ApiError);

impl axum::response::IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        self.0.into_response()
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        ErrorResponse(err)
    }
}
