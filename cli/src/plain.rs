//! ANSI-styled plain-text rendering.
//!
//! Every function returns a `String` so output can be inspected in tests; with
//! colour disabled the result is plain text with no escape sequences.

use std::fmt::Write as _;

use smartman_core::tips::Tip;
use smartman_core::{AnnotatedLine, ExamplePair, FragmentKind, LineMode, SectionView};

use crate::explain::{Explanation, OfflineReason};
use crate::theme::{Palette, Style, Theme};

/// Total width of panels and rules, in columns.
pub const DEFAULT_WIDTH: usize = 80;

const SUBTITLE: &str = "smartman - modern man page viewer";

pub struct PlainRenderer {
    palette: Palette,
    color: bool,
    width: usize,
}

impl PlainRenderer {
    pub fn new(theme: &Theme, color: bool) -> Self {
        Self {
            palette: theme.palette(),
            color,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Header panel followed by every section view.
    pub fn render_page(&self, command: &str, views: &[SectionView]) -> String {
        let mut out = self.render_header(command);
        for view in views {
            out.push_str(&self.render_section(view));
        }
        out
    }

    /// Boxed panel with the upper-cased command name centred inside.
    pub fn render_header(&self, command: &str) -> String {
        let inner = self.width - 2;
        let title = format!(" {} ", command.to_uppercase());
        let (left, right) = centre(inner, title.chars().count());
        let border = &self.palette.accent;

        let mut out = String::from("\n");
        let _ = writeln!(out, "{}", self.paint(border, &format!("╭{}╮", "─".repeat(inner))));
        let _ = writeln!(
            out,
            "{}{}{}{}{}",
            self.paint(border, "│"),
            " ".repeat(left),
            self.paint(&self.palette.heading, &title),
            " ".repeat(right),
            self.paint(border, "│"),
        );

        let subtitle = format!(" {SUBTITLE} ");
        let (left, right) = centre(inner, subtitle.chars().count());
        let _ = writeln!(
            out,
            "{}{}{}",
            self.paint(border, &format!("╰{}", "─".repeat(left))),
            self.paint(&self.palette.muted, &subtitle),
            self.paint(border, &format!("{}╯", "─".repeat(right))),
        );
        out.push('\n');
        out
    }

    /// Rule carrying the section name, the section's lines, and a blank line.
    pub fn render_section(&self, view: &SectionView) -> String {
        let mut out = self.render_rule(&view.name);
        let indent = " ".repeat(view.kind.indent());
        for line in &view.lines {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "{indent}{}", self.render_line(line));
            }
        }
        out.push('\n');
        out
    }

    pub fn render_rule(&self, title: &str) -> String {
        let label = format!(" {title} ");
        let (left, right) = centre(self.width, label.chars().count());
        format!(
            "{}{}{}\n",
            self.paint(&self.palette.border, &"─".repeat(left)),
            self.paint(&self.palette.heading, &label),
            self.paint(&self.palette.border, &"─".repeat(right)),
        )
    }

    /// Styles each fragment of one annotated line.
    pub fn render_line(&self, line: &AnnotatedLine) -> String {
        let plain = match line.mode {
            LineMode::Synopsis => &self.palette.synopsis,
            LineMode::Body => &self.palette.description,
        };
        line.fragments
            .iter()
            .map(|fragment| {
                let style = match fragment.kind {
                    FragmentKind::Flag => &self.palette.flag,
                    FragmentKind::Match => &self.palette.highlight,
                    FragmentKind::Plain => plain,
                };
                self.paint(style, &fragment.text)
            })
            .collect()
    }

    /// Quick-example cards: the description, then `> command`.
    pub fn render_gallery(&self, examples: &[ExamplePair]) -> String {
        let mut out = self.render_rule("QUICK EXAMPLES");
        if examples.is_empty() {
            let _ = writeln!(out, "  {}", self.paint(&self.palette.muted, "No examples found."));
            out.push('\n');
            return out;
        }
        for example in examples {
            let _ = writeln!(out, "  {}", self.paint(&self.palette.muted, &example.description));
            let _ = writeln!(
                out,
                "  {} {}",
                self.paint(&self.palette.accent, ">"),
                self.paint(&self.palette.flag, &example.command)
            );
            out.push('\n');
        }
        out
    }

    pub fn render_tip(&self, tip: &Tip) -> String {
        let mut out = String::from("\n");
        out.push_str(&self.render_rule(&format!("Tip: {}", tip.title)));
        for line in tip.content.lines() {
            let _ = writeln!(out, "  {}", self.render_code_spans(line));
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "  {}",
            self.paint(&self.palette.muted, "Run 'smartman --tip' for more!")
        );
        out.push('\n');
        out
    }

    /// Styles backtick-delimited spans with the accent style. An unmatched
    /// backtick leaves the rest of the line as description text.
    fn render_code_spans(&self, line: &str) -> String {
        let mut out = String::new();
        let mut rest = line;
        while let Some(open) = rest.find('`') {
            let Some(len) = rest[open + 1..].find('`') else {
                break;
            };
            let close = open + 1 + len;
            out.push_str(&self.paint(&self.palette.description, &rest[..open]));
            out.push_str(&self.paint(&self.palette.accent, &rest[open..=close]));
            rest = &rest[close + 1..];
        }
        out.push_str(&self.paint(&self.palette.description, rest));
        out
    }

    pub fn render_explanation(&self, command: &str, explanation: &Explanation) -> String {
        let mut out = String::from("\n");
        out.push_str(&self.render_rule(&format!("Explanation for {}", command.to_uppercase())));

        let (body, note) = match explanation {
            Explanation::Live(text) => (text.as_str(), None),
            Explanation::Offline { summary, reason } => {
                let note = match reason {
                    OfflineReason::NoApiKey => {
                        "Note: set GROQ_API_KEY in your environment to enable live explanations."
                            .to_string()
                    }
                    OfflineReason::Failed(err) => {
                        format!("Live explanation failed ({err}); showing the offline summary.")
                    }
                };
                (summary.as_str(), Some(note))
            }
        };

        for line in body.lines() {
            let _ = writeln!(out, "  {}", self.render_code_spans(line));
        }
        if let Some(note) = note {
            out.push('\n');
            let _ = writeln!(out, "  {}", self.paint(&self.palette.muted, &note));
        }
        out.push('\n');
        out
    }
}

/// Left and right padding that centres `len` columns within `width`.
fn centre(width: usize, len: usize) -> (usize, usize) {
    let free = width.saturating_sub(len);
    let left = free / 2;
    (left, free - left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartman_core::{Fragment, ManPage, project_page, project_section};

    fn renderer() -> PlainRenderer {
        PlainRenderer::new(&Theme::default(), false)
    }

    #[test]
    fn test_header_panel_is_upper_cased_and_boxed() {
        let out = renderer().render_header("git commit");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "");
        assert!(lines[1].starts_with('╭') && lines[1].ends_with('╮'));
        assert!(lines[2].contains(" GIT COMMIT "));
        assert!(lines[3].contains(SUBTITLE));
        for line in &lines[1..4] {
            assert_eq!(line.chars().count(), DEFAULT_WIDTH);
        }
    }

    #[test]
    fn test_rule_is_full_width() {
        let rule = renderer().render_rule("SEE ALSO");
        assert_eq!(rule.trim_end().chars().count(), DEFAULT_WIDTH);
        assert!(rule.contains(" SEE ALSO "));
    }

    #[test]
    fn test_section_indentation_by_kind() {
        let r = renderer();
        let synopsis = r.render_section(&project_section("SYNOPSIS", "ls [-a]", None));
        assert!(synopsis.contains("\n    ls [-a]\n"));

        let options = r.render_section(&project_section("OPTIONS", "-a  all", None));
        assert!(options.contains("\n    -a  all\n"));

        let body = r.render_section(&project_section("DESCRIPTION", "List files.", None));
        assert!(body.contains("\n  List files.\n"));
    }

    #[test]
    fn test_blank_lines_have_no_padding() {
        let out = renderer().render_section(&project_section("OPTIONS", "-a\n\n-b", None));
        assert!(out.contains("    -a\n\n    -b\n"));
    }

    #[test]
    fn test_render_line_without_color_is_verbatim() {
        let line = AnnotatedLine {
            mode: LineMode::Body,
            fragments: vec![
                Fragment::plain("use "),
                Fragment::flag("--"),
                Fragment::matched("force"),
            ],
        };
        assert_eq!(renderer().render_line(&line), "use --force");
    }

    #[test]
    fn test_render_page_lists_sections_in_order() {
        let page = ManPage::parse(
            "ls",
            "NAME\n       ls - list\nSYNOPSIS\n       ls [OPTION]\nSEE ALSO\n       dir(1)\n",
        );
        let out = renderer().render_page(page.command(), &project_page(&page, None));
        let name = out.find(" NAME ").unwrap();
        let synopsis = out.find(" SYNOPSIS ").unwrap();
        let see_also = out.find(" SEE ALSO ").unwrap();
        assert!(name < synopsis && synopsis < see_also);
        assert!(out.contains(" LS "));
    }

    #[test]
    fn test_gallery_cards() {
        let out = renderer().render_gallery(&[
            ExamplePair::new("List everything.", "ls -a"),
            ExamplePair::new("Long format.", "ls -l"),
        ]);
        assert!(out.contains("  List everything.\n  > ls -a\n"));
        assert!(out.contains("  Long format.\n  > ls -l\n"));

        let empty = renderer().render_gallery(&[]);
        assert!(empty.contains("No examples found."));
    }

    #[test]
    fn test_tip_keeps_code_spans() {
        let tip = Tip {
            title: "Disk",
            content: "Use `df -h` here.\nOr `du`",
        };
        let out = renderer().render_tip(&tip);
        assert!(out.contains("Tip: Disk"));
        assert!(out.contains("  Use `df -h` here.\n  Or `du`\n"));
    }

    #[test]
    fn test_code_spans_with_unmatched_backtick() {
        assert_eq!(renderer().render_code_spans("a `b` c `d"), "a `b` c `d");
    }

    #[test]
    fn test_explanation_notes() {
        let r = renderer();
        let live = r.render_explanation("ls", &Explanation::Live("Lists files.".into()));
        assert!(live.contains("Explanation for LS"));
        assert!(live.contains("  Lists files.\n"));
        assert!(!live.contains("GROQ_API_KEY"));

        let offline = r.render_explanation(
            "ls",
            &Explanation::Offline {
                summary: "Shows folders.".into(),
                reason: OfflineReason::NoApiKey,
            },
        );
        assert!(offline.contains("GROQ_API_KEY"));

        let failed = r.render_explanation(
            "ls",
            &Explanation::Offline {
                summary: "Shows folders.".into(),
                reason: OfflineReason::Failed("timeout".into()),
            },
        );
        assert!(failed.contains("(timeout)"));
    }

    #[test]
    fn test_color_output_contains_escapes() {
        colored::control::set_override(true);
        let r = PlainRenderer::new(&Theme::default(), true);
        let line = AnnotatedLine {
            mode: LineMode::Body,
            fragments: vec![Fragment::flag("-a")],
        };
        assert!(r.render_line(&line).contains('\x1b'));
    }
}
