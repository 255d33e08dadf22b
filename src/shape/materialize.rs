//! Conversion from decoded directive parameters to shapes.
//!
//! Every field a variant needs is always filled: a missing or unusable input
//! value is replaced by that variant's default.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::directive::{Directive, SkipReason, SkippedDirective};

use super::{CircleParams, LineParams, RectangleParams, Shape, ShapeType, TextParams};

/// Convert one directive into a shape.
///
/// Unknown type identifiers yield [`SkipReason::UnknownType`].
pub fn materialize(directive: &Directive) -> Result<Shape, SkipReason> {
    let shape_type = ShapeType::parse(&directive.type_name)
        .ok_or_else(|| SkipReason::UnknownType(directive.type_name.clone()))?;
    Ok(materialize_params(shape_type, &directive.params))
}

/// Convert a batch of directives, keeping order and collecting the rejects.
pub fn materialize_all(directives: &[Directive]) -> (Vec<Shape>, Vec<SkippedDirective>) {
    let mut shapes = Vec::with_capacity(directives.len());
    let mut skipped = Vec::new();

    for directive in directives {
        match materialize(directive) {
            Ok(shape) => shapes.push(shape),
            Err(reason) => {
                warn!("dropping directive {}: {}", directive.raw, reason);
                skipped.push(SkippedDirective {
                    raw: directive.raw.clone(),
                    reason,
                });
            }
        }
    }

    (shapes, skipped)
}

pub(super) fn materialize_params(shape_type: ShapeType, params: &Map<String, Value>) -> Shape {
    let fields = Fields {
        shape_type,
        params,
    };

    match shape_type {
        ShapeType::Rectangle => {
            let d = RectangleParams::default();
            Shape::Rectangle(RectangleParams {
                x: fields.number(&["x"], d.x),
                y: fields.number(&["y"], d.y),
                width: fields.number(&["width"], d.width),
                height: fields.number(&["height"], d.height),
                fill_color: fields.string(&["fillColor", "fill"], d.fill_color),
                stroke_color: fields.string(&["strokeColor", "stroke"], d.stroke_color),
            })
        }
        ShapeType::Circle => {
            let d = CircleParams::default();
            Shape::Circle(CircleParams {
                x: fields.number(&["x"], d.x),
                y: fields.number(&["y"], d.y),
                radius: fields.number(&["radius"], d.radius),
                fill_color: fields.string(&["fillColor", "fill"], d.fill_color),
                stroke_color: fields.string(&["strokeColor", "stroke"], d.stroke_color),
            })
        }
        ShapeType::Text => {
            let d = TextParams::default();
            Shape::Text(TextParams {
                x: fields.number(&["x"], d.x),
                y: fields.number(&["y"], d.y),
                content: fields.text(&["content", "text"], d.content),
                font_size: fields.number(&["fontSize"], d.font_size),
                fill_color: fields.string(&["fillColor", "fill"], d.fill_color),
            })
        }
        ShapeType::Line => {
            let d = LineParams::default();
            Shape::Line(LineParams {
                x1: fields.number(&["x1"], d.x1),
                y1: fields.number(&["y1"], d.y1),
                x2: fields.number(&["x2"], d.x2),
                y2: fields.number(&["y2"], d.y2),
                stroke_color: fields.string(&["strokeColor", "stroke"], d.stroke_color),
                stroke_width: fields.number(&["strokeWidth"], d.stroke_width),
            })
        }
    }
}

/// Lookup helper over a parameter map; the first present key wins.
struct Fields<'a> {
    shape_type: ShapeType,
    params: &'a Map<String, Value>,
}

impl Fields<'_> {
    fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|key| self.params.get(*key))
            .filter(|value| !value.is_null())
    }

    fn number(&self, keys: &[&str], default: f64) -> f64 {
        let Some(value) = self.lookup(keys) else {
            return default;
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed.filter(|n| n.is_finite()) {
            Some(n) => n,
            None => {
                debug!(
                    "{}: unusable {} value {}, using default {}",
                    self.shape_type, keys[0], value, default
                );
                default
            }
        }
    }

    /// Free text; numbers are written out as text.
    fn text(&self, keys: &[&str], default: String) -> String {
        match self.lookup(keys) {
            Some(Value::Number(n)) => n.to_string(),
            _ => self.string(keys, default),
        }
    }

    /// Non-empty strings only; used for colors.
    fn string(&self, keys: &[&str], default: String) -> String {
        match self.lookup(keys) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(other) => {
                debug!(
                    "{}: unusable {} value {}, using default",
                    self.shape_type, keys[0], other
                );
                default
            }
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn directive(type_name: &str, params: Value) -> Directive {
        Directive {
            type_name: type_name.to_string(),
            raw: format!("[CANVAS_CREATE:{}:{}]", type_name, params),
            params: params.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_rectangle_partial_params() {
        let shape = materialize(&directive("rect", json!({"width": 50, "x": 10, "y": 10}))).unwrap();
        assert_eq!(
            shape,
            Shape::Rectangle(RectangleParams {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 60.0,
                fill_color: "#3b82f6".to_string(),
                stroke_color: "#1e40af".to_string(),
            })
        );
    }

    #[test]
    fn test_every_type_fully_defaulted() {
        let cases = [
            ("rectangle", Shape::Rectangle(RectangleParams::default())),
            ("circle", Shape::Circle(CircleParams::default())),
            ("text", Shape::Text(TextParams::default())),
            ("line", Shape::Line(LineParams::default())),
        ];
        for (name, expected) in cases {
            assert_eq!(materialize(&directive(name, json!({}))).unwrap(), expected);
        }
    }

    #[test]
    fn test_documented_defaults() {
        assert_eq!(
            RectangleParams::default(),
            RectangleParams {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 60.0,
                fill_color: "#3b82f6".to_string(),
                stroke_color: "#1e40af".to_string(),
            }
        );
        assert_eq!(
            CircleParams::default(),
            CircleParams {
                x: 200.0,
                y: 150.0,
                radius: 30.0,
                fill_color: "#10b981".to_string(),
                stroke_color: "#059669".to_string(),
            }
        );
        assert_eq!(
            TextParams::default(),
            TextParams {
                x: 100.0,
                y: 50.0,
                content: "Text".to_string(),
                font_size: 16.0,
                fill_color: "#000000".to_string(),
            }
        );
        assert_eq!(
            LineParams::default(),
            LineParams {
                x1: 50.0,
                y1: 50.0,
                x2: 150.0,
                y2: 150.0,
                stroke_color: "#ef4444".to_string(),
                stroke_width: 3.0,
            }
        );
    }

    #[test]
    fn test_single_missing_field_gets_its_default() {
        let full = json!({"x1": 1, "y1": 2, "x2": 3, "strokeColor": "#111", "strokeWidth": 9});
        let shape = materialize(&directive("line", full)).unwrap();
        let Shape::Line(p) = shape else {
            panic!("expected line");
        };
        assert_eq!(p.y2, 150.0);
        assert_eq!(p.x1, 1.0);
        assert_eq!(p.stroke_width, 9.0);
    }

    #[test]
    fn test_aliases_and_numeric_strings() {
        let shape = materialize(&directive(
            "text",
            json!({"text": "Revenue", "fontSize": "24", "fill": "#ff0000"}),
        ))
        .unwrap();
        assert_eq!(
            shape,
            Shape::Text(TextParams {
                x: 100.0,
                y: 50.0,
                content: "Revenue".to_string(),
                font_size: 24.0,
                fill_color: "#ff0000".to_string(),
            })
        );
    }

    #[test]
    fn test_wrong_kind_replaced_by_default() {
        let shape = materialize(&directive(
            "circle",
            json!({"radius": "big", "x": true, "fillColor": 12, "strokeColor": ""}),
        ))
        .unwrap();
        let Shape::Circle(p) = shape else {
            panic!("expected circle");
        };
        assert_eq!(p.radius, 30.0);
        assert_eq!(p.x, 200.0);
        assert_eq!(p.fill_color, "#10b981");
        assert_eq!(p.stroke_color, "#059669");
    }

    #[test]
    fn test_numeric_text_content_kept() {
        let shape = materialize(&directive("label", json!({"content": 42, "fill": 7}))).unwrap();
        let Shape::Text(p) = shape else {
            panic!("expected text");
        };
        assert_eq!(p.content, "42");
        assert_eq!(p.fill_color, "#000000");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = materialize(&directive("triangle", json!({"x": 1}))).unwrap_err();
        assert_eq!(err, SkipReason::UnknownType("triangle".to_string()));
    }

    #[test]
    fn test_materialize_all_keeps_order() {
        let directives = vec![
            directive("circle", json!({})),
            directive("triangle", json!({})),
            directive("rect", json!({})),
        ];
        let (shapes, skipped) = materialize_all(&directives);
        let types: Vec<_> = shapes.iter().map(Shape::shape_type).collect();
        assert_eq!(types, vec![ShapeType::Circle, ShapeType::Rectangle]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].reason, SkipReason::UnknownType("triangle".to_string()));
    }

    #[test]
    fn test_skipped_unknown_type_keeps_source_text() {
        let reply = r#"Look: [CANVAS_CREATE:triangle:{"y":1, "x":2}] ok"#;
        let extraction = crate::directive::extract(reply);
        let (shapes, skipped) = materialize_all(&extraction.directives);
        assert!(shapes.is_empty());
        assert_eq!(skipped[0].raw, r#"[CANVAS_CREATE:triangle:{"y":1, "x":2}]"#);
    }
}
