//! Structure recovery for rendered manual pages.
//!
//! This crate turns the flat text produced by `man` into a typed document
//! that renderers can drive without re-parsing:
//!
//! - [`segment`]: splits raw text into an ordered [`Sections`] map keyed by
//!   the all-caps section headings.
//! - [`ManPage`]: the immutable document holding command, raw text, sections,
//!   case-insensitive [`ManPage::section`] lookup and
//!   [`ManPage::examples`].
//! - [`extract_examples`]: recovers up to four description/command pairs
//!   from an `EXAMPLES` body.
//! - [`annotate`]: splits a line into flag, plain and search-match
//!   fragments.
//! - [`project_section`] / [`project_page`]: annotated views of sections
//!   shared by every renderer.
//!
//! Everything here is a pure function of its inputs. Nothing fails except a
//! lookup that yields no text, reported as [`ManError::NotFound`] by the
//! manual source.
//!
//! # Example
//!
//! ```
//! use smartman_core::{FragmentKind, LineMode, ManPage, annotate};
//!
//! let raw = "\
//! NAME
//!     foo - does a thing
//! SYNOPSIS
//!     foo [-x] FILE
//! ";
//!
//! let page = ManPage::parse("foo", raw);
//! assert_eq!(page.section("name"), "foo - does a thing");
//!
//! let line = annotate(page.section("SYNOPSIS"), LineMode::Synopsis, None);
//! assert_eq!(line.fragments[1].text, "-x");
//! assert_eq!(line.fragments[1].kind, FragmentKind::Flag);
//! ```

mod annotate;
mod document;
mod error;
mod extract;
mod lines;
mod render;
mod segment;
pub mod tips;

pub use annotate::{
    AnnotatedLine, Fragment, FragmentKind, LineMode, annotate, flag_spans, is_flag_token,
};
pub use document::ManPage;
pub use error::{ManError, Result};
pub use extract::{ExamplePair, MAX_EXAMPLES, extract_examples, is_command_line};
pub use render::{SectionKind, SectionView, first_matching_section, project_page, project_section};
pub use segment::{Sections, is_section_header, segment};
