//! # Shapes
//!
//! Canonical drawable records produced from assistant replies.
//!
//! A [`Shape`] is one of four variants, each carrying every field its
//! renderer needs. [`ShapeRecord`] ties a shape to its owner before
//! persistence; [`StoredShape`] is what the store hands back.
//!
//! ## Serialized form
//!
//! ```json
//! {
//!   "id": 7,
//!   "type": "rectangle",
//!   "parameters": {"x": 10, "y": 10, "width": 50, "height": 60,
//!                  "fillColor": "#3b82f6", "strokeColor": "#1e40af"},
//!   "ownerId": "user-1",
//!   "createdAt": "2026-01-01T00:00:00Z"
//! }
//! ```

mod materialize;

pub use materialize::{materialize, materialize_all};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The four recognized shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Circle,
    Text,
    Line,
}

impl ShapeType {
    /// Resolve a directive type identifier, accepting common aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" | "box" => Some(ShapeType::Rectangle),
            "circle" => Some(ShapeType::Circle),
            "text" | "label" => Some(ShapeType::Text),
            "line" => Some(ShapeType::Line),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Text => "text",
            ShapeType::Line => "line",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleParams {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: String,
    pub stroke_color: String,
}

impl Default for RectangleParams {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            width: 100.0,
            height: 60.0,
            fill_color: "#3b82f6".to_string(),
            stroke_color: "#1e40af".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleParams {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill_color: String,
    pub stroke_color: String,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 150.0,
            radius: 30.0,
            fill_color: "#10b981".to_string(),
            stroke_color: "#059669".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: f64,
    pub fill_color: String,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 50.0,
            content: "Text".to_string(),
            font_size: 16.0,
            fill_color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineParams {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            x1: 50.0,
            y1: 50.0,
            x2: 150.0,
            y2: 150.0,
            stroke_color: "#ef4444".to_string(),
            stroke_width: 3.0,
        }
    }
}

/// A fully specified drawable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(RectangleParams),
    Circle(CircleParams),
    Text(TextParams),
    Line(LineParams),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rectangle(_) => ShapeType::Rectangle,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Text(_) => ShapeType::Text,
            Shape::Line(_) => ShapeType::Line,
        }
    }

    /// Field map for storage backends that keep parameters as a JSON column.
    pub fn parameters(&self) -> Map<String, Value> {
        let value = match self {
            Shape::Rectangle(p) => serde_json::to_value(p),
            Shape::Circle(p) => serde_json::to_value(p),
            Shape::Text(p) => serde_json::to_value(p),
            Shape::Line(p) => serde_json::to_value(p),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Rebuild a shape from a stored type name and parameter map.
    ///
    /// Parameters go through the materializer, so rows written by older
    /// clients with missing fields come back complete.
    pub fn from_parts(type_name: &str, parameters: &Value) -> Option<Self> {
        let params = parameters.as_object().cloned().unwrap_or_default();
        Some(materialize::materialize_params(
            ShapeType::parse(type_name)?,
            &params,
        ))
    }
}

/// A shape bound to its owner, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub shape: Shape,
    pub owner_id: String,
}

impl ShapeRecord {
    pub fn new(shape: Shape, owner_id: impl Into<String>) -> Self {
        Self {
            shape,
            owner_id: owner_id.into(),
        }
    }
}

/// A persisted shape with its storage-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredShape {
    pub id: i64,
    #[serde(flatten)]
    pub shape: Shape,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}
