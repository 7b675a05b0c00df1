//! Safe text checks: control characters and HTML fragments.
//!
//! A value is safe when sanitizing it as an HTML fragment with no permitted
//! tags leaves it unchanged. Sanitizers escape a few characters that are fine
//! in plain text, so those escapes are restored before comparing.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

// Tab, line feed and carriage return are allowed in free text.
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Cc}&&[^\t\n\r]]").unwrap());

/// Escapes produced by the sanitizer that are restored to their literal character.
/// `&amp;` must stay last so restored text is never unescaped twice.
pub const PERMITTED_UNESCAPED_CHARACTERS: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", "\u{a0}"),
    ("&amp;", "&"),
];

pub fn has_control_chars(text: &str) -> bool {
    CONTROL_CHARS.is_match(text)
}

/// Runs the HTML sanitizer and restores the permitted escapes.
pub fn sanitize(text: &str) -> String {
    let cleaned = ammonia::Builder::empty().clean(text).to_string();

    PERMITTED_UNESCAPED_CHARACTERS
        .iter()
        .fold(cleaned, |acc, (escape, literal)| acc.replace(escape, literal))
}

/// True for blank text or text the sanitizer leaves untouched.
pub fn is_sanitized(text: &str) -> bool {
    if text.trim().is_empty() {
        return true;
    }
    // The HTML parser folds CR and CRLF into LF.
    normalize_newlines(&sanitize(text)) == normalize_newlines(text)
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
