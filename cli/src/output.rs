//! Section selection and structured output formats.

use serde::Serialize;
use smartman_core::{ExamplePair, ManPage, Sections, first_matching_section};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// ANSI-styled text for the terminal.
    #[default]
    Plain,
    Json,
    Yaml,
    Markdown,
}

/// Which sections of a page to show.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Section names to keep, matched case-insensitively. Empty keeps all.
    pub names: Vec<String>,
    /// Keep only the first section containing this query.
    pub jump_to: Option<String>,
}

impl Selection {
    /// Applies the selection to `page`, preserving document order.
    ///
    /// # Errors
    ///
    /// Returns an error when a jump query matches no section.
    pub fn apply(&self, page: &ManPage) -> Result<Sections, String> {
        let jump_target = match self.jump_to.as_deref() {
            Some(query) => Some(first_matching_section(page, query).ok_or_else(|| {
                format!("No section of '{}' matches '{query}'", page.command())
            })?),
            None => None,
        };

        let wanted: Vec<String> = self.names.iter().map(|name| name.to_uppercase()).collect();
        let mut selected = Sections::new();
        for (name, body) in page.sections().iter() {
            let named = wanted.is_empty() || wanted.contains(&name.to_uppercase());
            let jumped = jump_target.is_none_or(|target| target == name);
            if named && jumped {
                selected.insert(name, body);
            }
        }
        Ok(selected)
    }
}

/// Serializable view of a page: raw text is never included.
#[derive(Debug, Serialize)]
pub struct PageOutput<'a> {
    pub command: &'a str,
    pub sections: &'a Sections,
    pub examples: &'a [ExamplePair],
}

/// Formats a page view as JSON, YAML or Markdown.
///
/// # Errors
///
/// Returns an error for [`OutputFormat::Plain`], which is rendered by the
/// theme-aware renderer instead, or when serialization fails.
pub fn format_page(output: &PageOutput<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(output)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(output).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(page_to_markdown(output)),
        OutputFormat::Plain => Err("plain output is rendered, not serialized".to_string()),
    }
}

fn page_to_markdown(output: &PageOutput<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", output.command));

    if !output.examples.is_empty() {
        out.push_str("## Quick Examples\n\n");
        for example in output.examples {
            out.push_str(&format!(
                "- {}\n\n  ```sh\n  {}\n  ```\n\n",
                example.description, example.command
            ));
        }
    }

    for (name, body) in output.sections.iter() {
        out.push_str(&format!("## {name}\n\n"));
        if !body.is_empty() {
            out.push_str(&format!("```text\n{body}\n```\n\n"));
        }
    }

    out
}
