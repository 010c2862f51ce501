//! The structured manual page document.

use serde::Serialize;

use crate::extract::{ExamplePair, extract_examples};
use crate::segment::{Sections, segment};

/// A parsed manual page.
///
/// Built once from raw text and never mutated afterwards; all queries are
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManPage {
    command: String,
    #[serde(skip)]
    raw_text: String,
    sections: Sections,
}

impl ManPage {
    /// Segments `raw_text` into sections for `command`.
    pub fn parse(command: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let sections = segment(&raw_text);
        Self {
            command: command.into(),
            raw_text,
            sections,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// The unmodified text the page was parsed from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Case-insensitive section lookup.
    ///
    /// Returns an empty string when the section is absent, so "missing" and
    /// "empty" read the same to callers.
    pub fn section(&self, name: &str) -> &str {
        self.sections.find_ignore_case(name).unwrap_or("")
    }

    /// Up to four quick examples from `EXAMPLES`, or from `EXAMPLE` when
    /// `EXAMPLES` is absent or empty.
    pub fn examples(&self) -> Vec<ExamplePair> {
        let body = match self.section("EXAMPLES") {
            "" => self.section("EXAMPLE"),
            body => body,
        };
        if body.is_empty() {
            return Vec::new();
        }
        extract_examples(body)
    }
}
