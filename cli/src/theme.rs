//! Colour themes for the plain renderer.
//!
//! A theme is a flat YAML mapping from semantic style names to style
//! descriptors such as `bold yellow` or `bold white on magenta`:
//!
//! ```yaml
//! heading: bold cyan
//! flag: bold yellow
//! highlight: "bold #282a36 on #ff79c6"
//! ```
//!
//! Keys that are absent take their default value, so a theme file only needs
//! to name what it changes. Hex colours must be quoted because YAML treats
//! ` #` as the start of a comment.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use colored::{Color, ColoredString, Colorize};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the theme used when none is requested or the requested one fails.
pub const DEFAULT_THEME: &str = "default";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("default", include_str!("../themes/default.yaml")),
    ("dracula", include_str!("../themes/dracula.yaml")),
    ("solarized", include_str!("../themes/solarized.yaml")),
];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown theme '{name}' (built-in themes: {available})")]
    Unknown { name: String, available: String },

    #[error("invalid theme name '{0}'")]
    InvalidName(String),
}

/// Style descriptors for each semantic role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub heading: String,
    pub accent: String,
    pub flag: String,
    pub description: String,
    pub synopsis: String,
    pub border: String,
    pub muted: String,
    pub highlight: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            heading: "bold cyan".to_string(),
            accent: "cyan".to_string(),
            flag: "bold yellow".to_string(),
            description: "white".to_string(),
            synopsis: "italic bright_green".to_string(),
            border: "blue".to_string(),
            muted: "dim white".to_string(),
            highlight: "bold white on magenta".to_string(),
        }
    }
}

impl Theme {
    /// Loads a theme from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Io`] if the file cannot be read, or
    /// [`ThemeError::Yaml`] if it is not a valid theme mapping.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let theme = serde_yaml::from_reader(reader)?;
        Ok(theme)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ThemeError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses every descriptor into a ready-to-use [`Palette`].
    pub fn palette(&self) -> Palette {
        Palette {
            heading: Style::parse(&self.heading),
            accent: Style::parse(&self.accent),
            flag: Style::parse(&self.flag),
            description: Style::parse(&self.description),
            synopsis: Style::parse(&self.synopsis),
            border: Style::parse(&self.border),
            muted: Style::parse(&self.muted),
            highlight: Style::parse(&self.highlight),
        }
    }
}

/// Names of the themes compiled into the binary.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_THEMES.iter().map(|(name, _)| *name)
}

/// Directory searched for user themes, if one can be determined.
///
/// `$SMARTMAN_THEME_DIR` wins, then `$XDG_CONFIG_HOME/smartman/themes`, then
/// `~/.config/smartman/themes`.
pub fn theme_dir() -> Option<PathBuf> {
    if let Some(dir) = non_empty_env("SMARTMAN_THEME_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Some(config) = non_empty_env("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(config).join("smartman").join("themes"));
    }
    non_empty_env("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("smartman")
            .join("themes")
    })
}

/// Looks `name` up in `dir` (as `<name>.yaml`), then among the built-ins.
///
/// Names that could leave `dir` (path separators, `..`) are rejected.
pub fn find_theme(name: &str, dir: Option<&Path>) -> Result<Theme, ThemeError> {
    if !is_valid_theme_name(name) {
        return Err(ThemeError::InvalidName(name.to_string()));
    }

    if let Some(dir) = dir {
        let path = dir.join(format!("{name}.yaml"));
        if path.is_file() {
            debug!(path = %path.display(), "loading theme file");
            return Theme::load(&path);
        }
    }

    match BUILTIN_THEMES.iter().find(|(builtin, _)| *builtin == name) {
        Some((_, raw)) => Theme::from_yaml(raw),
        None => Err(ThemeError::Unknown {
            name: name.to_string(),
            available: builtin_names().collect::<Vec<_>>().join(", "),
        }),
    }
}

fn is_valid_theme_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

/// Like [`find_theme`], but any failure degrades to the default theme.
pub fn resolve_theme(name: &str, dir: Option<&Path>) -> Theme {
    match find_theme(name, dir) {
        Ok(theme) => theme,
        Err(err) => {
            warn!(theme = name, error = %err, "falling back to the default theme");
            Theme::default()
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parsed styles for each semantic role of a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub heading: Style,
    pub accent: Style,
    pub flag: Style,
    pub description: Style,
    pub synopsis: Style,
    pub border: Style,
    pub muted: Style,
    pub highlight: Style,
}

/// A terminal text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dimmed: bool,
    pub italic: bool,
    pub underline: bool,
    pub reversed: bool,
    pub strikethrough: bool,
}

impl Style {
    /// Parses a style descriptor. Unknown words are ignored.
    pub fn parse(descriptor: &str) -> Self {
        let mut style = Self::default();
        let mut words = descriptor.split_whitespace();

        while let Some(word) = words.next() {
            match word.to_ascii_lowercase().as_str() {
                "bold" | "b" => style.bold = true,
                "dim" => style.dimmed = true,
                "italic" | "i" => style.italic = true,
                "underline" | "u" => style.underline = true,
                "reverse" | "r" => style.reversed = true,
                "strike" | "s" => style.strikethrough = true,
                "on" => {
                    if let Some(bg) = words.next().and_then(parse_color) {
                        style.bg = Some(bg);
                    }
                }
                other => {
                    if let Some(fg) = parse_color(other) {
                        style.fg = Some(fg);
                    }
                }
            }
        }

        style
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let mut out = text.normal();
        if let Some(fg) = self.fg {
            out = out.color(fg);
        }
        if let Some(bg) = self.bg {
            out = out.on_color(bg);
        }
        if self.bold {
            out = out.bold();
        }
        if self.dimmed {
            out = out.dimmed();
        }
        if self.italic {
            out = out.italic();
        }
        if self.underline {
            out = out.underline();
        }
        if self.reversed {
            out = out.reversed();
        }
        if self.strikethrough {
            out = out.strikethrough();
        }
        out
    }
}

/// Parses a colour name (`red`, `bright_green`, `grey`) or `#rrggbb`.
fn parse_color(word: &str) -> Option<Color> {
    if let Some(hex) = word.strip_prefix('#') {
        return parse_hex(hex);
    }

    let word = word.to_ascii_lowercase().replace(['-', ' '], "_");
    let (bright, base) = match word.strip_prefix("bright_") {
        Some(base) => (true, base),
        None => (false, word.as_str()),
    };

    let color = match (bright, base) {
        (false, "black") => Color::Black,
        (false, "red") => Color::Red,
        (false, "green") => Color::Green,
        (false, "yellow") => Color::Yellow,
        (false, "blue") => Color::Blue,
        (false, "magenta" | "purple") => Color::Magenta,
        (false, "cyan") => Color::Cyan,
        (false, "white") => Color::White,
        (false, "grey" | "gray") | (true, "black") => Color::BrightBlack,
        (true, "red") => Color::BrightRed,
        (true, "green") => Color::BrightGreen,
        (true, "yellow") => Color::BrightYellow,
        (true, "blue") => Color::BrightBlue,
        (true, "magenta" | "purple") => Color::BrightMagenta,
        (true, "cyan") => Color::BrightCyan,
        (true, "white") => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::TrueColor {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}
