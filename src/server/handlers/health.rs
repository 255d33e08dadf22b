//! Health check handler.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use std::sync::Arc;

use crate::error::CofounderError;

use super::super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Error,
    /// Not configured; ignored for the overall verdict.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    pub database: ServiceStatus,
    pub llm: ServiceStatus,
    pub vector_index: ServiceStatus,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub services: Services,
    pub overall: OverallStatus,
}

fn status(name: &str, result: Result<(), CofounderError>) -> ServiceStatus {
    match result {
        Ok(()) => ServiceStatus::Healthy,
        Err(e) => {
            warn!("health check: {} unavailable: {}", name, e);
            ServiceStatus::Error
        }
    }
}

/// Healthy only when no enabled service reported an error.
pub fn overall(statuses: &[ServiceStatus]) -> OverallStatus {
    if statuses.contains(&ServiceStatus::Error) {
        OverallStatus::Degraded
    } else {
        OverallStatus::Healthy
    }
}

/// GET /api/health - Probe every collaborator.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let services = &state.services;

    let database = status("database", services.shapes.ping().await);
    let llm = match &services.chat {
        Some(model) => status("llm", model.health().await),
        None => ServiceStatus::Disabled,
    };
    let vector_index = status("vector index", services.index.health().await);

    let overall = overall(&[database, llm, vector_index]);
    let code = match overall {
        OverallStatus::Healthy => StatusCode::OK,
        OverallStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthReport {
            timestamp: Utc::now(),
            services: Services {
                database,
                llm,
                vector_index,
            },
            overall,
        }),
    )
}
