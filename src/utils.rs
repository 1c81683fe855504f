//! Utility functions for timestamps, text normalisation, and string truncation.
//!
//! This module provides helper functions used throughout the application:
//! - ISO-8601 timestamps for `scraped_at` fields
//! - Whitespace normalisation for text pulled out of HTML nodes
//! - Character-safe truncation for error excerpts and log previews

use chrono::{Local, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Current local time as an ISO-8601 / RFC 3339 string with microseconds.
///
/// # Examples
///
/// ```ignore
/// let ts = now_iso(); // "2025-05-06T14:30:00.123456+02:00"
/// ```
pub fn now_iso() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Join the text nodes of an element into one display string.
///
/// Runs of whitespace (including newlines and tabs left over from the
/// markup's indentation) are collapsed to a single space and the result is
/// trimmed.
///
/// # Arguments
///
/// * `parts` - The text fragments, typically `ElementRef::text()`
pub fn normalize_text<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined: String = parts.into_iter().collect();
    WHITESPACE.replace_all(joined.trim(), " ").into_owned()
}

/// Keep at most `max` characters of `s`.
///
/// Unlike byte slicing this never splits a multi-byte character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        let rest = s.len() - kept.len();
        format!("{kept}…(+{rest} bytes)")
    }
}
