//! Removing directives from the text shown to the user.

use super::grammar::DIRECTIVE_PATTERN;

/// Strip every directive from `text` and trim surrounding whitespace.
///
/// Removal repeats until no directive remains, so text that only forms a
/// directive after an inner one is removed is also cleaned. Applying this to
/// its own output returns the output unchanged.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = DIRECTIVE_PATTERN.replace_all(&current, "");
        if next.len() == current.len() {
            break;
        }
        current = next.into_owned();
    }
    current.trim().to_string()
}
