//! # Authentication
//!
//! Every authenticated route resolves its caller through one
//! [`AuthStrategy`], chosen at startup:
//!
//! - **Demo**: the bearer token must equal a shared demo token, and the
//!   caller's user id is taken from the request body.
//! - **Verified**: the bearer token is checked with the [`AuthProvider`]
//!   and the provider's user id is used; ids claimed in the body are ignored.

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CofounderError;

/// User id assigned to demo callers that do not name one.
pub const DEMO_USER_ID: &str = "demo-user";

/// Identity returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Account sign-up and token verification.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, CofounderError>;

    async fn verify_token(&self, token: &str) -> Result<AuthUser, CofounderError>;
}

/// Which strategy to build from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AuthMode {
    #[default]
    Demo,
    Verified,
}

/// How callers are identified.
#[derive(Clone)]
pub enum AuthStrategy {
    Demo { token: String },
    Verified(Arc<dyn AuthProvider>),
}

impl AuthStrategy {
    pub fn from_mode(
        mode: AuthMode,
        demo_token: impl Into<String>,
        provider: Arc<dyn AuthProvider>,
    ) -> Self {
        match mode {
            AuthMode::Demo => AuthStrategy::Demo {
                token: demo_token.into(),
            },
            AuthMode::Verified => AuthStrategy::Verified(provider),
        }
    }

    /// Resolve the caller's user id.
    ///
    /// `claimed_user` is the id the client put in the request body; only the
    /// demo strategy honors it.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        claimed_user: Option<&str>,
    ) -> Result<String, CofounderError> {
        let token = bearer_token(headers)
            .ok_or_else(|| CofounderError::Auth("Authorization header required".to_string()))?;

        match self {
            AuthStrategy::Demo { token: expected } => {
                if token != expected.as_str() {
                    return Err(CofounderError::Auth("Invalid token".to_string()));
                }
                let user_id = claimed_user
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .unwrap_or(DEMO_USER_ID);
                debug!("demo auth accepted for {}", user_id);
                Ok(user_id.to_string())
            }
            AuthStrategy::Verified(provider) => {
                let user = provider.verify_token(token).await?;
                Ok(user.id)
            }
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}
