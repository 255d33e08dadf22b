//! # Heuristic Fallback
//!
//! When a reply carries no directive but the user plainly asked for a
//! drawing, a small fixed set of default shapes is produced instead.
//!
//! Output is deterministic and never exceeds [`MAX_FALLBACK_SHAPES`].

use log::info;
use regex::Regex;
use std::sync::LazyLock;

use crate::shape::{CircleParams, RectangleParams, Shape};

/// Upper bound on shapes produced by one fallback run.
pub const MAX_FALLBACK_SHAPES: usize = 3;

/// English words match whole (plural allowed); Russian stems match as
/// prefixes so inflected endings still count.
struct Keywords {
    words: &'static [&'static str],
    stems: &'static [&'static str],
}

const RECTANGLE_KEYWORDS: Keywords = Keywords {
    words: &["rectangle", "box"],
    stems: &["прямоугольник", "квадрат"],
};
const CIRCLE_KEYWORDS: Keywords = Keywords {
    words: &["circle"],
    stems: &["круг"],
};
const GENERIC_KEYWORDS: Keywords = Keywords {
    words: &["diagram", "chart", "draw", "shape"],
    stems: &["диаграмм", "схем", "нарисуй"],
};

static RECTANGLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(&RECTANGLE_KEYWORDS));
static CIRCLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(&CIRCLE_KEYWORDS));
static GENERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(&GENERIC_KEYWORDS));

fn keyword_pattern(keywords: &Keywords) -> Regex {
    let join = |list: &[&str]| {
        list.iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|")
    };
    let pattern = format!(
        r"(?i)\b(?:(?:{})(?:e?s)?\b|(?:{}))",
        join(keywords.words),
        join(keywords.stems)
    );
    Regex::new(&pattern).expect("keyword pattern is valid")
}

/// Preset positions and fills for the "N rectangles" request.
const PRESET_RECTANGLES: [(f64, f64, &str); MAX_FALLBACK_SHAPES] = [
    (50.0, 50.0, "#3b82f6"),
    (200.0, 50.0, "#10b981"),
    (350.0, 50.0, "#f59e0b"),
];

/// Which keyword groups a request mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualIntent {
    pub rectangle: bool,
    pub circle: bool,
    pub generic: bool,
    pub has_count: bool,
}

impl VisualIntent {
    pub fn detect(request: &str) -> Self {
        Self {
            rectangle: RECTANGLE_PATTERN.is_match(request),
            circle: CIRCLE_PATTERN.is_match(request),
            generic: GENERIC_PATTERN.is_match(request),
            has_count: request.chars().any(|c| c.is_ascii_digit()),
        }
    }

    pub fn is_visual(&self) -> bool {
        self.rectangle || self.circle || self.generic
    }
}

/// Synthesize shapes for a request that received no directives.
///
/// Returns an empty list when the request shows no visual intent.
pub fn fallback_shapes(user_request: &str) -> Vec<Shape> {
    let intent = VisualIntent::detect(user_request);
    if !intent.is_visual() {
        return Vec::new();
    }

    let shapes = if intent.has_count && intent.rectangle {
        preset_rectangles()
    } else {
        let mut shapes = Vec::new();
        if intent.rectangle {
            shapes.push(Shape::Rectangle(RectangleParams::default()));
        }
        if intent.circle {
            shapes.push(Shape::Circle(CircleParams::default()));
        }
        if shapes.is_empty() {
            shapes.push(Shape::Rectangle(RectangleParams::default()));
        }
        shapes
    };

    info!(
        "no directives in reply, fallback produced {} shape(s) ({:?})",
        shapes.len(),
        intent
    );
    shapes
}

fn preset_rectangles() -> Vec<Shape> {
    PRESET_RECTANGLES
        .iter()
        .map(|&(x, y, fill)| {
            Shape::Rectangle(RectangleParams {
                x,
                y,
                fill_color: fill.to_string(),
                ..RectangleParams::default()
            })
        })
        .collect()
}
