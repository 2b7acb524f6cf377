//! Lexical repairs that turn the upstream logger's JSON-like output into JSON.
//!
//! These are heuristics over a narrow, fixed input shape, not a grammar. The
//! key-quoting pass works on raw text and will also quote a word followed by a
//! colon inside a string value (`"10:30"` becomes `""10":30"`), which makes
//! that line undecodable.
//!
//! The bare-value fallback only quotes values that start with a letter or `_`.
//! An unquoted value starting with a digit that is not a JSON number, such as
//! the date in `{date => 2024-01-01}`, is left alone and the line fails as
//! malformed.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Non-standard key/value separator emitted by the upstream logger.
pub const ARROW_SEPARATOR: &str = "=>";

// A run of word characters followed by optional whitespace and a colon.
static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*:").expect("key pattern is a valid regex"));

// An unquoted identifier-like value sitting between a colon and the next
// `,`, `}` or `]`.
static BARE_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(:\s*)([A-Za-z_][\w.\-/ ]*?)(\s*[,}\]])").expect("bare value pattern is a valid regex")
});

/// Applies both line normalizations: `=>` becomes `:`, then every word run
/// directly followed by a colon is wrapped in double quotes.
pub fn normalize_line(line: &str) -> String {
    let line = line.replace(ARROW_SEPARATOR, ":");
    KEY_PATTERN.replace_all(&line, "\"${1}\":").into_owned()
}

/// Quotes bare identifier values (`"status": Rejected` becomes
/// `"status": "Rejected"`). JSON literals `true`, `false` and `null` are left
/// alone. Returns `Cow::Borrowed` when no candidate value was found.
pub fn quote_bare_values(payload: &str) -> Cow<'_, str> {
    BARE_VALUE_PATTERN.replace_all(payload, |caps: &Captures| {
        let value = &caps[2];
        if matches!(value, "true" | "false" | "null") {
            caps[0].to_string()
        } else {
            format!("{}\"{}\"{}", &caps[1], value, &caps[3])
        }
    })
}
