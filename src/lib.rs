//! # Cofounder - Chat Backend with Canvas Directives
//!
//! Cofounder is the backend of an "AI co-founder" chat assistant whose
//! replies can draw on a shared canvas. It provides:
//!
//! - **Directive protocol**: `[CANVAS_CREATE:<type>:<json>]` markers embedded
//!   in assistant text, extracted and stripped before display
//! - **Shape materialization**: defaults, aliases and value coercion for
//!   rectangles, circles, text and lines
//! - **Fallback drawing**: preset shapes when the user asked for a drawing and
//!   the model emitted no directive
//! - **HTTP API**: chat, canvas, registration, search and health routes
//!
//! ## Quick Start
//!
//! ```no_run
//! use cofounder::{process_assistant_reply, store::MemoryBackend};
//!
//! # async fn example() {
//! let store = MemoryBackend::new();
//! let reply = process_assistant_reply(
//!     &store,
//!     r#"Here you go [CANVAS_CREATE:circle:{"x":100,"y":100,"radius":40}]"#,
//!     "user-1",
//!     Some("draw a circle"),
//! )
//! .await;
//!
//! assert_eq!(reply.display_text, "Here you go");
//! assert_eq!(reply.created_shapes.len(), 1);
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`directive`] | Directive scanning, extraction and sanitizing |
//! | [`shape`] | Shape types and parameter materialization |
//! | [`fallback`] | Drawing-intent detection and preset shapes |
//! | [`reply`] | The reply pipeline tying the above to a store |
//! | [`store`] | Shape and user persistence |
//! | [`auth`] | Request authentication |
//! | [`llm`] | Chat model and embedding clients, prompt building |
//! | [`search`] | Vector index over past conversations |
//! | [`tasks`] | Background job queue |
//! | [`server`] | HTTP server |
//! | [`error`] | Error types |

pub mod auth;
pub mod config;
pub mod directive;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod reply;
pub mod search;
pub mod server;
pub mod shape;
pub mod store;
pub mod tasks;

// Re-exports for convenience
pub use config::ServerConfig;
pub use error::CofounderError;
pub use reply::{ProcessedReply, process_assistant_reply};
