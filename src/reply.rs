//! # Reply Processing
//!
//! Turns one raw assistant reply into display text plus persisted shapes:
//!
//! ```text
//! raw reply ─┬─ extract ─┬─ (directives) ── materialize ─┬─ save ── created shapes
//!            │           └─ (none) ── fallback(request) ─┘
//!            └─ sanitize ── display text
//! ```
//!
//! Nothing in here fails the whole reply. Malformed directives, unknown
//! types and storage errors each drop only the affected shape.

use futures_util::future::join_all;
use log::{debug, warn};
use serde::Serialize;

use crate::directive::{self, SkippedDirective};
use crate::fallback;
use crate::shape::{self, ShapeRecord, StoredShape};
use crate::store::ShapeStore;

/// Outcome of processing one reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedReply {
    /// Reply with every directive removed.
    pub display_text: String,
    /// Shapes that were persisted, in directive order.
    pub created_shapes: Vec<StoredShape>,
    /// True when the shapes came from the keyword fallback.
    pub used_fallback: bool,
    /// Directives that produced no shape.
    #[serde(skip)]
    pub skipped: Vec<SkippedDirective>,
    /// Shapes that could not be stored.
    #[serde(skip)]
    pub failed_saves: usize,
}

/// Process `raw_text` on behalf of `owner_id`.
///
/// `user_request` is the message that prompted the reply; when the reply
/// holds no directive it is checked for drawing intent.
pub async fn process_assistant_reply(
    store: &dyn ShapeStore,
    raw_text: &str,
    owner_id: &str,
    user_request: Option<&str>,
) -> ProcessedReply {
    let extraction = directive::extract(raw_text);
    let display_text = directive::sanitize(raw_text);

    let mut skipped = extraction.skipped;
    let (shapes, used_fallback) = if extraction.directives.is_empty() {
        let shapes = user_request
            .map(fallback::fallback_shapes)
            .unwrap_or_default();
        let used = !shapes.is_empty();
        (shapes, used)
    } else {
        let (shapes, rejected) = shape::materialize_all(&extraction.directives);
        skipped.extend(rejected);
        (shapes, false)
    };

    let saves = shapes
        .into_iter()
        .map(|s| store.save(ShapeRecord::new(s, owner_id)));
    let mut created_shapes = Vec::new();
    let mut failed_saves = 0;
    for result in join_all(saves).await {
        match result {
            Ok(stored) => created_shapes.push(stored),
            Err(e) => {
                failed_saves += 1;
                warn!("failed to store shape for {}: {}", owner_id, e);
            }
        }
    }

    debug!(
        "processed reply for {}: {} created, {} skipped, {} failed, fallback={}",
        owner_id,
        created_shapes.len(),
        skipped.len(),
        failed_saves,
        used_fallback
    );

    ProcessedReply {
        display_text,
        created_shapes,
        used_fallback,
        skipped,
        failed_saves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::SkipReason;
    use crate::error::CofounderError;
    use crate::shape::{RectangleParams, Shape, ShapeType};
    use crate::store::MemoryBackend;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails every second save.
    struct FlakyStore {
        inner: MemoryBackend,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ShapeStore for FlakyStore {
        async fn save(&self, record: ShapeRecord) -> Result<StoredShape, CofounderError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                return Err(CofounderError::Storage("connection reset".to_string()));
            }
            self.inner.save(record).await
        }

        async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<StoredShape>, CofounderError> {
            self.inner.list_by_owner(owner_id).await
        }

        async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, CofounderError> {
            self.inner.delete(owner_id, id).await
        }

        async fn ping(&self) -> Result<(), CofounderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_directive_reply() {
        let store = MemoryBackend::new();
        let processed = process_assistant_reply(
            &store,
            r#"Here: [CANVAS_CREATE:rect:{"width":50,"x":10,"y":10}]"#,
            "u1",
            Some("show me a box"),
        )
        .await;

        assert_eq!(processed.display_text, "Here:");
        assert!(!processed.used_fallback);
        assert_eq!(processed.created_shapes.len(), 1);

        let stored = &processed.created_shapes[0];
        assert_eq!(stored.owner_id, "u1");
        assert_eq!(
            stored.shape,
            Shape::Rectangle(RectangleParams {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                ..RectangleParams::default()
            })
        );
        assert_eq!(store.list_by_owner("u1").await.unwrap(), processed.created_shapes);
    }

    #[tokio::test]
    async fn test_fallback_when_no_directive() {
        let store = MemoryBackend::new();
        let processed =
            process_assistant_reply(&store, "Sure, here you go.", "u1", Some("draw 3 rectangles"))
                .await;

        assert!(processed.used_fallback);
        assert_eq!(processed.display_text, "Sure, here you go.");
        assert_eq!(processed.created_shapes.len(), 3);
        assert!(
            processed
                .created_shapes
                .iter()
                .all(|s| s.shape.shape_type() == ShapeType::Rectangle)
        );
    }

    #[tokio::test]
    async fn test_no_fallback_when_directives_present() {
        let store = MemoryBackend::new();
        let processed = process_assistant_reply(
            &store,
            "[CANVAS_CREATE:circle:{}]",
            "u1",
            Some("draw 3 rectangles"),
        )
        .await;
        assert!(!processed.used_fallback);
        assert_eq!(processed.created_shapes.len(), 1);
        assert_eq!(processed.created_shapes[0].shape.shape_type(), ShapeType::Circle);
    }

    #[tokio::test]
    async fn test_business_questions_draw_nothing() {
        let store = MemoryBackend::new();
        for request in [
            "We sell a developer sandbox",
            "What is the drawback of SaaS?",
            "Draft our company charter",
        ] {
            let processed = process_assistant_reply(&store, "Sure.", "u1", Some(request)).await;
            assert!(processed.created_shapes.is_empty(), "{}", request);
            assert!(!processed.used_fallback);
        }
        assert!(store.list_by_owner("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_dropped_and_stripped() {
        let store = MemoryBackend::new();
        let processed = process_assistant_reply(
            &store,
            r#"A triangle [CANVAS_CREATE:triangle:{"x":1}] for you"#,
            "u1",
            Some("draw a triangle"),
        )
        .await;

        assert!(processed.created_shapes.is_empty());
        assert!(!processed.used_fallback);
        assert_eq!(processed.display_text, "A triangle  for you");
        assert_eq!(processed.skipped.len(), 1);
        assert_eq!(
            processed.skipped[0].reason,
            SkipReason::UnknownType("triangle".to_string())
        );
    }

    #[tokio::test]
    async fn test_partial_success() {
        let store = MemoryBackend::new();
        let reply = concat!(
            r#"[CANVAS_CREATE:rect:{"x":1}]"#,
            r#"[CANVAS_CREATE:rect:{x:2}]"#,
            r#"[CANVAS_CREATE:hexagon:{}]"#,
            r#"[CANVAS_CREATE:line:{}]"#,
        );
        let processed = process_assistant_reply(&store, reply, "u1", None).await;

        let types: Vec<_> = processed
            .created_shapes
            .iter()
            .map(|s| s.shape.shape_type())
            .collect();
        assert_eq!(types, vec![ShapeType::Rectangle, ShapeType::Line]);
        assert_eq!(processed.skipped.len(), 2);
        assert_eq!(processed.display_text, "");
    }

    #[tokio::test]
    async fn test_storage_failures_skip_only_that_shape() {
        let store = FlakyStore {
            inner: MemoryBackend::new(),
            calls: AtomicUsize::new(0),
        };
        let reply = "[CANVAS_CREATE:rect:{}] [CANVAS_CREATE:circle:{}] [CANVAS_CREATE:line:{}]";
        let processed = process_assistant_reply(&store, reply, "u1", None).await;

        assert_eq!(processed.failed_saves, 1);
        assert_eq!(processed.created_shapes.len(), 2);
        assert_eq!(processed.display_text, "");
    }

    #[tokio::test]
    async fn test_plain_reply_without_request() {
        let store = MemoryBackend::new();
        let processed = process_assistant_reply(&store, "  Talk to customers.  ", "u1", None).await;
        assert_eq!(
            processed,
            ProcessedReply {
                display_text: "Talk to customers.".to_string(),
                ..ProcessedReply::default()
            }
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(ProcessedReply {
            display_text: "hi".to_string(),
            ..ProcessedReply::default()
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"displayText": "hi", "createdShapes": [], "usedFallback": false})
        );
    }
}
