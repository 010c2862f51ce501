//! Cleanup of terminal formatting left in rendered man output.

use regex::Regex;
use std::sync::LazyLock;

// SAFETY: These regexes are compile-time constants and are validated by tests.
static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile"));
static OVERSTRIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".\x08").expect("static regex must compile"));

/// Removes ANSI escape sequences and backspace overstrikes, and normalizes
/// line endings to `\n`.
///
/// This is the in-process stand-in for `col -b`.
pub fn strip_formatting(raw: &str) -> String {
    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    cleaned.replace("\r\n", "\n").replace('\r', "\n")
}

/// Prepares manual text for an external reader: formatting is stripped and
/// every remaining control character other than `\n`, `\r` and `\t` is
/// dropped.
pub fn clean_control_chars(raw: &str) -> String {
    let stripped = strip_formatting(raw);
    stripped
        .chars()
        .filter(|ch| !ch.is_control() || matches!(ch, '\n' | '\r' | '\t'))
        .collect()
}

/// Returns at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
