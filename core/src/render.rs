//! Projection of document sections into annotated lines.
//!
//! Renderers never look at raw section bodies directly: they ask for a
//! [`SectionView`] and style its fragments. That keeps the plain renderer and
//! the interactive view in agreement about what is a flag and what matched a
//! search.

use crate::annotate::{AnnotatedLine, LineMode, annotate};
use crate::document::ManPage;
use crate::lines::split_lines;

/// Layout role of a section, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Synopsis,
    Options,
    Body,
}

impl SectionKind {
    /// Classifies a section by name, case-insensitively.
    pub fn classify(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "SYNOPSIS" => Self::Synopsis,
            "OPTIONS" => Self::Options,
            _ => Self::Body,
        }
    }

    pub fn line_mode(self) -> LineMode {
        match self {
            Self::Synopsis => LineMode::Synopsis,
            Self::Options | Self::Body => LineMode::Body,
        }
    }

    /// Left padding, in columns, used when printing section lines.
    pub fn indent(self) -> usize {
        match self {
            Self::Synopsis | Self::Options => 4,
            Self::Body => 2,
        }
    }
}

/// One section ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub name: String,
    pub kind: SectionKind,
    pub lines: Vec<AnnotatedLine>,
}

impl SectionView {
    pub fn has_match(&self) -> bool {
        self.lines.iter().any(AnnotatedLine::has_match)
    }
}

/// Annotates every line of `body`; an empty body yields no lines.
pub fn project_section(name: &str, body: &str, query: Option<&str>) -> SectionView {
    let kind = SectionKind::classify(name);
    let mode = kind.line_mode();
    SectionView {
        name: name.to_string(),
        kind,
        lines: split_lines(body)
            .into_iter()
            .map(|line| annotate(line, mode, query))
            .collect(),
    }
}

/// Projects every section of `page` in header-encounter order.
pub fn project_page(page: &ManPage, query: Option<&str>) -> Vec<SectionView> {
    page.sections()
        .iter()
        .map(|(name, body)| project_section(name, body, query))
        .collect()
}

/// Name of the first section whose name or body contains `query`,
/// case-insensitively. Used to jump to the first search hit.
pub fn first_matching_section<'a>(page: &'a ManPage, query: &str) -> Option<&'a str> {
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    page.sections()
        .iter()
        .find(|(name, body)| {
            name.to_lowercase().contains(&needle) || body.to_lowercase().contains(&needle)
        })
        .map(|(name, _)| name)
}
