//! Directive extraction: grammar matches decoded into parameter maps.

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

use super::grammar::scan;

/// A directive whose payload decoded to a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Type identifier as written by the model (e.g. "rect").
    pub type_name: String,
    /// Decoded payload fields.
    pub params: Map<String, Value>,
    /// Directive text as it appeared in the reply.
    pub raw: String,
}

/// Why a directive produced no shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("malformed directive payload: {0}")]
    MalformedJson(String),
    #[error("directive payload is not a JSON object")]
    NotAnObject,
    #[error("unknown shape type '{0}'")]
    UnknownType(String),
}

/// A directive that was recognized but dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDirective {
    /// Directive text as it appeared in the reply.
    pub raw: String,
    pub reason: SkipReason,
}

/// Result of scanning one reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Decoded directives in order of appearance.
    pub directives: Vec<Directive>,
    /// Directives dropped because their payload could not be decoded.
    pub skipped: Vec<SkippedDirective>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Scan `text` for directives and decode each payload.
///
/// A payload that fails to decode is skipped on its own; scanning carries on
/// with the next match.
pub fn extract(text: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for raw in scan(text) {
        let source = raw.source(text).to_string();
        let reason = match serde_json::from_str::<Value>(&raw.json) {
            Ok(Value::Object(params)) => {
                extraction.directives.push(Directive {
                    type_name: raw.type_name,
                    params,
                    raw: source,
                });
                continue;
            }
            Ok(_) => SkipReason::NotAnObject,
            Err(e) => SkipReason::MalformedJson(e.to_string()),
        };

        warn!("skipping directive {}: {}", source, reason);
        extraction.skipped.push(SkippedDirective {
            raw: source,
            reason,
        });
    }

    extraction
}
