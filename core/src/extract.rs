//! Quick-example extraction from `EXAMPLES` sections.
//!
//! Man pages conventionally write examples as a prose line followed by the
//! invocation indented beneath it:
//!
//! ```text
//! Create a backup
//!        foo -b file.txt
//! ```

use serde::Serialize;

use crate::lines::split_lines;

/// Maximum number of example pairs kept for the gallery.
pub const MAX_EXAMPLES: usize = 4;

/// Minimum run of leading spaces that marks an example command line.
const COMMAND_INDENT: &str = "       ";

/// A human-readable description paired with the invocation it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamplePair {
    pub description: String,
    pub command: String,
}

impl ExamplePair {
    pub fn new(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: command.into(),
        }
    }
}

/// Recovers up to [`MAX_EXAMPLES`] description/command pairs from a section
/// body, in encounter order.
///
/// Blank lines are skipped without forgetting a pending description. A
/// command line with no pending description borrows the line directly above
/// it, but only when that raw line is non-blank: a blank separator suppresses
/// the fallback even if prose appears further up.
pub fn extract_examples(section_body: &str) -> Vec<ExamplePair> {
    let lines = split_lines(section_body);
    let mut examples = Vec::new();
    let mut pending: Option<&str> = None;

    for (index, line) in lines.iter().enumerate() {
        if examples.len() == MAX_EXAMPLES {
            break;
        }

        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        if !is_command_line(line) {
            pending = Some(stripped);
            continue;
        }

        if let Some(description) = pending.take() {
            examples.push(ExamplePair::new(description, stripped));
        } else if index > 0 {
            let previous = lines[index - 1].trim();
            if !previous.is_empty() {
                examples.push(ExamplePair::new(previous, stripped));
            }
        }
    }

    examples
}

/// Returns `true` for lines indented like an example invocation: at least
/// seven literal spaces, or a leading tab.
pub fn is_command_line(line: &str) -> bool {
    line.starts_with(COMMAND_INDENT) || line.starts_with('\t')
}
