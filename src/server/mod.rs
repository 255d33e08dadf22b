//! # HTTP Server
//!
//! JSON API for the co-founder chat and its canvas.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /api/chat` | chat with the assistant, create shapes |
//! | `GET /api/canvas` | list the caller's shapes |
//! | `DELETE /api/canvas/:id` | delete one shape |
//! | `POST /api/auth/register` | create an account and profile |
//! | `POST /api/search` | semantic search over past ideas |
//! | `GET /api/health` | probe the collaborators |
//!
//! ## Usage
//!
//! ```bash
//! cofounder serve --listen 0.0.0.0:8080
//! ```

mod handlers;
mod state;

pub use crate::config::ServerConfig;
pub use state::{AppState, Collaborators};

use axum::{
    Router,
    routing::{delete, get, post},
};
use log::info;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::CofounderError;
use crate::tasks::TaskQueue;

/// Build the API router over prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/canvas", get(handlers::canvas::list))
        .route("/api/canvas/:id", delete(handlers::canvas::remove))
        .route("/api/auth/register", post(handlers::register::register))
        .route("/api/search", post(handlers::search::search))
        .route("/api/health", get(handlers::health::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cofounder::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), cofounder::error::CofounderError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8080".to_string(),
///     ..ServerConfig::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CofounderError> {
    info!("starting cofounder server: {}", config.describe());

    let services = Collaborators::from_config(&config)?;
    let (tasks, _worker) = TaskQueue::start();
    let listen_addr = config.listen_addr.clone();
    let app = router(Arc::new(AppState::new(config, services, tasks)));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| {
            CofounderError::Config(format!("Failed to bind to {}: {}", listen_addr, e))
        })?;
    info!("listening on http://{}/", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
