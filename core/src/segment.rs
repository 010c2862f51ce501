//! Section segmentation for rendered man-page text.
//!
//! Rendered manual pages mark each section with a flush-left, all-caps
//! heading (`NAME`, `SYNOPSIS`, `SEE ALSO`, `EXIT-STATUS`). Everything between
//! one heading and the next is that section's body.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::lines::split_lines;

/// Ordered mapping of section name to section body.
///
/// Iteration follows the order in which each heading first appeared. A
/// repeated heading replaces the earlier body but keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body` under `name`, replacing any existing body in place.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        let name = name.into();
        let body = body.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = body,
            None => self.entries.push((name, body)),
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, body)| body.as_str())
    }

    /// Case-insensitive lookup returning the first matching section.
    pub fn find_ignore_case(&self, name: &str) -> Option<&str> {
        let wanted = name.to_uppercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_uppercase() == wanted)
            .map(|(_, body)| body.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Section names in header-encounter order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, body)` pairs in header-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, body) in &self.entries {
            map.serialize_entry(name, body)?;
        }
        map.end()
    }
}

/// Splits rendered man text into named sections.
///
/// Lines before the first heading are discarded. A section's body is its
/// right-trimmed content lines joined with `\n` and then trimmed, so interior
/// blank lines survive while leading indentation of the first line does not.
/// A trailing heading with no content lines after it is dropped.
pub fn segment(raw: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in split_lines(raw) {
        let line = line.trim_end();
        if is_section_header(line) {
            if let Some(name) = current.take() {
                sections.insert(name, finish_body(&buffer));
            }
            current = Some(line.trim().to_string());
            buffer.clear();
            continue;
        }

        if current.is_some() {
            buffer.push(line);
        }
    }

    if let Some(name) = current
        && !buffer.is_empty()
    {
        sections.insert(name, finish_body(&buffer));
    }

    sections
}

fn finish_body(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Returns `true` when `line` is a section heading.
///
/// A heading is non-blank, does not start with a space, contains no
/// lower-case letters, is at least two characters long, and consists of
/// alphabetic characters once spaces and hyphens are removed.
pub fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || line.starts_with(' ') {
        return false;
    }
    if trimmed != trimmed.to_uppercase() {
        return false;
    }
    if trimmed.chars().count() < 2 {
        return false;
    }

    let mut letters = trimmed
        .chars()
        .filter(|ch| *ch != ' ' && *ch != '-')
        .peekable();
    letters.peek().is_some() && letters.all(char::is_alphabetic)
}
