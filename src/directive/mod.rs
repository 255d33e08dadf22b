//! # Canvas Directives
//!
//! Assistant replies may ask for shapes to be drawn by embedding inline
//! directives:
//!
//! ```text
//! [CANVAS_CREATE:<type>:<json-object>]
//! ```
//!
//! The payload ends at the first `}`, so only flat JSON objects are accepted.
//! A payload with nested objects never matches the grammar and is left in the
//! text untouched.
//!
//! ## Example
//!
//! ```
//! use cofounder::directive::{extract, sanitize};
//!
//! let reply = r#"Sure! [CANVAS_CREATE:rect:{"width":50}] Done."#;
//!
//! let extraction = extract(reply);
//! assert_eq!(extraction.directives.len(), 1);
//! assert_eq!(extraction.directives[0].type_name, "rect");
//! assert_eq!(sanitize(reply), "Sure!  Done.");
//! ```

mod extract;
mod grammar;
mod sanitize;

pub use extract::{Directive, Extraction, SkipReason, SkippedDirective, extract};
pub use grammar::{RawDirective, scan};
pub use sanitize::sanitize;
