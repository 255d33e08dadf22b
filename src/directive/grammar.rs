//! Directive grammar: locating `[CANVAS_CREATE:<type>:{...}]` tokens.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Type identifier is any run without `:`; payload runs to the first `}`.
pub(super) static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[CANVAS_CREATE:([^:]+):(\{[^}]*\})\]").expect("directive pattern is valid")
});

/// One syntactic match of the grammar, before the payload is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDirective {
    /// Type identifier exactly as written.
    pub type_name: String,
    /// Payload text including both braces.
    pub json: String,
    /// Byte range of the whole directive in the scanned text.
    pub span: Range<usize>,
}

impl RawDirective {
    /// The full directive text as it appeared in the source.
    pub fn source<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }
}

/// Find all non-overlapping directives, left to right.
pub fn scan(text: &str) -> impl Iterator<Item = RawDirective> + '_ {
    DIRECTIVE_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(RawDirective {
            type_name: caps.get(1)?.as_str().to_string(),
            json: caps.get(2)?.as_str().to_string(),
            span: whole.range(),
        })
    })
}
