//! Line splitting shared by segmentation, example extraction and projection.

/// Returns true for every character that ends a line of rendered text.
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits `text` into lines.
///
/// Breaks on `\n`, `\r\n` (one break), a lone `\r`, vertical tab, form feed,
/// the file/group/record separators, NEL and the Unicode line and paragraph
/// separators. A final break does not produce a trailing empty line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&text[start..offset]);
        start = offset + ch.len_utf8();
        if ch == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_matches_lines_for_plain_newlines() {
        let text = "a\n\nb\n";
        assert_eq!(split_lines(text), text.lines().collect::<Vec<_>>());
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_lines_empty_input() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn test_split_lines_crlf_is_one_break() {
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\r\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_lines_lone_carriage_return() {
        assert_eq!(split_lines("a\rb\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_lines_control_and_unicode_breaks() {
        assert_eq!(split_lines("a\u{0c}b\u{0b}c"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\u{1c}b\u{1d}c\u{1e}d"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{85}b\u{2028}c\u{2029}"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_lines_keeps_other_whitespace() {
        assert_eq!(split_lines("\ta b\u{a0}\n"), vec!["\ta b\u{a0}"]);
    }
}
