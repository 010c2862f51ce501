//! Manual page acquisition.
//!
//! A [`ManSource`] turns a command name into rendered manual text, or
//! [`ManError::NotFound`] when there is none. Every acquisition failure
//! (missing `man`, non-zero exit, blank output, timeout) collapses into that
//! one error; the underlying cause is only logged.
//!
//! - [`SystemManSource`] runs the system `man` command.
//! - [`StaticManSource`] serves pre-rendered text from memory.
//! - [`load_page`] fetches and parses in one step.
//!
//! # Example
//!
//! ```
//! use smartman_source::{StaticManSource, load_page};
//!
//! let source = StaticManSource::new()
//!     .with_page("foo", "NAME\n       foo - does a thing\n");
//!
//! let page = load_page(&source, "foo").unwrap();
//! assert_eq!(page.section("NAME"), "foo - does a thing");
//! assert!(load_page(&source, "bar").is_err());
//! ```

pub mod normalize;
mod system;

use std::collections::HashMap;

use smartman_core::{ManError, ManPage, Result};

pub use system::{DEFAULT_TIMEOUT, SystemManSource};

/// Anything that can resolve a command to its rendered manual text.
pub trait ManSource {
    /// Returns the rendered page for `command`.
    ///
    /// # Errors
    ///
    /// Returns [`ManError::NotFound`] when no non-blank page is available.
    fn fetch(&self, command: &str) -> Result<String>;
}

/// Fetches `command` from `source` and parses it into a [`ManPage`].
pub fn load_page(source: &impl ManSource, command: &str) -> Result<ManPage> {
    let raw = source.fetch(command)?;
    Ok(ManPage::parse(command, raw))
}

/// In-memory manual source keyed by command name.
#[derive(Debug, Clone, Default)]
pub struct StaticManSource {
    pages: HashMap<String, String>,
}

impl StaticManSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, command: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(command, text);
        self
    }

    pub fn insert(&mut self, command: impl Into<String>, text: impl Into<String>) {
        self.pages.insert(command.into(), text.into());
    }
}

impl ManSource for StaticManSource {
    fn fetch(&self, command: &str) -> Result<String> {
        match self.pages.get(command) {
            Some(text) if !text.trim().is_empty() => Ok(text.clone()),
            _ => Err(ManError::not_found(command)),
        }
    }
}
