//! Error type for manual page lookups.
//!
//! Parsing itself never fails: headerless or malformed text degrades to an
//! empty section map and an empty example list. The only failure a caller
//! sees is a lookup that produced no manual text at all.

use thiserror::Error;

/// Errors that can occur while resolving a manual page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManError {
    /// No manual text could be obtained for the command.
    ///
    /// Covers a missing `man` binary, a non-zero exit, blank output and a
    /// timed-out lookup alike.
    #[error("No manual entry for '{command}'")]
    NotFound {
        /// The command as requested by the caller (e.g. `git commit`).
        command: String,
    },
}

impl ManError {
    /// Builds a [`ManError::NotFound`] for `command`.
    pub fn not_found(command: impl Into<String>) -> Self {
        Self::NotFound {
            command: command.into(),
        }
    }

    /// Returns the command this error refers to.
    pub fn command(&self) -> &str {
        match self {
            Self::NotFound { command } => command,
        }
    }
}

/// Convenience alias for results with [`ManError`].
pub type Result<T> = std::result::Result<T, ManError>;
