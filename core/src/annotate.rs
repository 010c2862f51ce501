//! Token-level annotation of rendered lines.
//!
//! A line is split into flag tokens (`-v`, `--verbose-mode`) and the plain
//! runs between them, then optionally overlaid with case-insensitive search
//! matches. Both the plain renderer and the interactive view consume the
//! resulting [`AnnotatedLine`]s; styling is left to the presentation layer.

use std::ops::Range;

/// Plain-text style context of a line.
///
/// Fragment categorization is identical in both modes; the presentation
/// layer picks a different style for plain runs in `SYNOPSIS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineMode {
    /// Lines of the `SYNOPSIS` section.
    Synopsis,
    /// Lines of `OPTIONS` and every other section.
    #[default]
    Body,
}

/// Category of one annotated fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// A command-line flag spelling.
    Flag,
    /// Any text that is neither a flag nor a search match.
    Plain,
    /// A search-query occurrence; overrides the underlying category.
    Match,
}

/// A styled run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
}

impl Fragment {
    pub fn new(text: impl Into<String>, kind: FragmentKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn flag(text: impl Into<String>) -> Self {
        Self::new(text, FragmentKind::Flag)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, FragmentKind::Plain)
    }

    pub fn matched(text: impl Into<String>) -> Self {
        Self::new(text, FragmentKind::Match)
    }
}

/// A line decomposed into ordered, non-empty fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedLine {
    pub mode: LineMode,
    pub fragments: Vec<Fragment>,
}

impl AnnotatedLine {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Reassembles the original line text.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn has_match(&self) -> bool {
        self.fragments
            .iter()
            .any(|f| f.kind == FragmentKind::Match)
    }
}

/// Annotates one line with flag and search-match fragments.
///
/// An empty or absent `query` never produces [`FragmentKind::Match`]
/// fragments. Matches are found over the whole line, so an occurrence may
/// straddle a flag boundary; each overlapped piece becomes part of a single
/// match fragment.
pub fn annotate(line: &str, mode: LineMode, query: Option<&str>) -> AnnotatedLine {
    let base = split_flags(line);
    let matches = match query {
        Some(query) if !query.is_empty() => find_matches(line, query),
        _ => Vec::new(),
    };

    let fragments = if matches.is_empty() {
        base.into_iter()
            .map(|(range, kind)| Fragment::new(&line[range], kind))
            .collect()
    } else {
        overlay_matches(line, &base, &matches)
    };

    AnnotatedLine { mode, fragments }
}

/// Byte ranges of every flag token in `line`, leftmost first.
///
/// A flag is one or two hyphens, an ASCII letter, then any run of word
/// characters or hyphens. There is no word-boundary requirement, so the
/// `-bar` in `foo-bar` is a flag too.
pub fn flag_spans(line: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let Some(prefix) = flag_prefix_len(&chars[i..]) else {
            i += 1;
            continue;
        };

        let mut end = i + prefix + 1;
        while end < chars.len() && is_flag_body_char(chars[end].1) {
            end += 1;
        }

        let start_byte = chars[i].0;
        let end_byte = chars.get(end).map_or(line.len(), |(offset, _)| *offset);
        spans.push(start_byte..end_byte);
        i = end;
    }

    spans
}

/// Returns `true` when the whole of `token` is a single flag.
pub fn is_flag_token(token: &str) -> bool {
    matches!(flag_spans(token).as_slice(), [span] if *span == (0..token.len()))
}

/// Number of leading hyphens (1 or 2) when `chars` starts a flag.
fn flag_prefix_len(chars: &[(usize, char)]) -> Option<usize> {
    let at = |n: usize| chars.get(n).map(|(_, ch)| *ch);
    if at(0) != Some('-') {
        return None;
    }
    if at(1) == Some('-') && at(2).is_some_and(|ch| ch.is_ascii_alphabetic()) {
        return Some(2);
    }
    if at(1).is_some_and(|ch| ch.is_ascii_alphabetic()) {
        return Some(1);
    }
    None
}

fn is_flag_body_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

fn split_flags(line: &str) -> Vec<(Range<usize>, FragmentKind)> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for span in flag_spans(line) {
        if span.start > cursor {
            out.push((cursor..span.start, FragmentKind::Plain));
        }
        cursor = span.end;
        out.push((span, FragmentKind::Flag));
    }
    if cursor < line.len() {
        out.push((cursor..line.len(), FragmentKind::Plain));
    }

    out
}

/// Non-overlapping, case-insensitive occurrences of `query`, leftmost first.
fn find_matches(line: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().collect();
    let hay: Vec<(usize, char)> = line.char_indices().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i + needle.len() <= hay.len() {
        let hit = needle
            .iter()
            .zip(&hay[i..])
            .all(|(q, (_, h))| chars_eq_ignore_case(*q, *h));
        if hit {
            let end = i + needle.len();
            let end_byte = hay.get(end).map_or(line.len(), |(offset, _)| *offset);
            found.push(hay[i].0..end_byte);
            i = end;
        } else {
            i += 1;
        }
    }

    found
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn overlay_matches(
    line: &str,
    base: &[(Range<usize>, FragmentKind)],
    matches: &[Range<usize>],
) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    // Index of the match that produced the last pushed Match fragment.
    let mut last_match: Option<usize> = None;

    for (range, kind) in base {
        let mut cursor = range.start;
        while cursor < range.end {
            let hit = matches
                .iter()
                .position(|m| m.start <= cursor && cursor < m.end);

            let (end, piece_kind) = match hit {
                Some(idx) => (matches[idx].end.min(range.end), FragmentKind::Match),
                None => {
                    let next_start = matches
                        .iter()
                        .map(|m| m.start)
                        .filter(|start| *start > cursor)
                        .min()
                        .unwrap_or(range.end);
                    (next_start.min(range.end), *kind)
                }
            };

            let text = &line[cursor..end];
            match (hit, fragments.last_mut()) {
                (Some(idx), Some(prev)) if last_match == Some(idx) => prev.text.push_str(text),
                _ => fragments.push(Fragment::new(text, piece_kind)),
            }
            last_match = hit;
            cursor = end;
        }
    }

    fragments
}
