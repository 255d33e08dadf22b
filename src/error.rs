//! # Error Types
//!
//! This module defines error types used throughout the cofounder library.
//!
//! Directive problems are deliberately absent: malformed or unknown
//! directives are reported as skipped items by [`crate::directive`], never
//! as errors.

use thiserror::Error;

/// Main error type for cofounder operations
#[derive(Debug, Error)]
pub enum CofounderError {
    /// Persistence collaborator failed (insert, list, delete)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing, invalid or rejected credentials
    #[error("Auth error: {0}")]
    Auth(String),

    /// Chat completion, embedding or vector index call failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Caller supplied an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Server configuration is incomplete or inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CofounderError {
    /// Wrap a reqwest failure as an upstream error, tagged with the service name.
    pub fn upstream(service: &str, err: impl std::fmt::Display) -> Self {
        CofounderError::Upstream(format!("{}: {}", service, err))
    }

    /// Wrap a reqwest failure coming from the storage backend.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        CofounderError::Storage(err.to_string())
    }
}
