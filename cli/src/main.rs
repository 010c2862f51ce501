mod explain;
mod output;
mod plain;
mod theme;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use smartman_core::tips::{TIPS, pick_tip};
use smartman_core::{ManPage, Sections, project_section};
use smartman_source::normalize::strip_formatting;
use smartman_source::{DEFAULT_TIMEOUT, StaticManSource, SystemManSource, load_page};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::explain::{ExplainConfig, explain};
use crate::output::{OutputFormat, PageOutput, Selection, format_page};
use crate::plain::{DEFAULT_WIDTH, PlainRenderer};
use crate::theme::{DEFAULT_THEME, resolve_theme, theme_dir};

const LOG_ENV: &str = "SMARTMAN_LOG";

#[derive(Debug, Parser)]
#[command(name = "smartman", version)]
#[command(about = "Modern man page viewer with structured sections, quick examples and tips")]
struct Cli {
    /// Command to look up; several words are joined (e.g. `git commit`).
    command: Vec<String>,
    /// Read pre-rendered manual text from a file (`-` for stdin) instead of running man.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// Theme name: a built-in or `<name>.yaml` in the theme directory.
    #[arg(long, short = 't', default_value = DEFAULT_THEME)]
    theme: String,
    /// Highlight case-insensitive occurrences of QUERY.
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,
    /// Show only the first section matching the search query.
    #[arg(long, requires = "search")]
    jump: bool,
    /// Show only the named section (repeatable, case-insensitive).
    #[arg(long = "section", value_name = "NAME")]
    sections: Vec<String>,
    /// Show only the quick examples.
    #[arg(long)]
    examples: bool,
    /// Print a random shell tip and exit.
    #[arg(long)]
    tip: bool,
    /// Explain the command in plain language (live with GROQ_API_KEY, offline otherwise).
    #[arg(long)]
    explain: bool,
    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,
    /// Width of panels and rules.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Seconds to wait for man before giving up.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
    /// Enable debug logging (overridden by SMARTMAN_LOG).
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), String> {
    let renderer = plain_renderer(&cli);

    if cli.tip {
        return run_tip(&renderer);
    }

    if cli.command.is_empty() && cli.file.is_none() {
        println!("Usage: smartman <command>");
        println!("Try 'smartman --help' for more info.");
        return Ok(());
    }

    let page = acquire_page(&cli)?;
    debug!(
        command = page.command(),
        sections = page.sections().len(),
        "parsed manual page"
    );

    if cli.explain {
        return run_explain(&page, &renderer);
    }
    if cli.examples {
        return run_examples(&page, cli.format, &renderer);
    }
    run_view(&cli, &page, &renderer)
}

fn plain_renderer(cli: &Cli) -> PlainRenderer {
    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty());
    let theme = resolve_theme(&cli.theme, theme_dir().as_deref());
    PlainRenderer::new(&theme, color).with_width(cli.width)
}

fn run_tip(renderer: &PlainRenderer) -> Result<(), String> {
    let tip = pick_tip(TIPS, clock_seed()).ok_or("no tips available")?;
    print!("{}", renderer.render_tip(tip));
    Ok(())
}

fn run_explain(page: &ManPage, renderer: &PlainRenderer) -> Result<(), String> {
    let explanation = explain(page.command(), page.raw_text(), &ExplainConfig::from_env());
    print!("{}", renderer.render_explanation(page.command(), &explanation));
    Ok(())
}

fn run_examples(page: &ManPage, format: OutputFormat, renderer: &PlainRenderer) -> Result<(), String> {
    let examples = page.examples();
    if format == OutputFormat::Plain {
        print!("{}", renderer.render_gallery(&examples));
        return Ok(());
    }

    let output = PageOutput {
        command: page.command(),
        sections: &Sections::new(),
        examples: &examples,
    };
    println!("{}", format_page(&output, format)?);
    Ok(())
}

fn run_view(cli: &Cli, page: &ManPage, renderer: &PlainRenderer) -> Result<(), String> {
    let selection = Selection {
        names: cli.sections.clone(),
        jump_to: if cli.jump { cli.search.clone() } else { None },
    };
    let selected = selection.apply(page)?;

    if cli.format == OutputFormat::Plain {
        let query = cli.search.as_deref();
        let views: Vec<_> = selected
            .iter()
            .map(|(name, body)| project_section(name, body, query))
            .collect();
        print!("{}", renderer.render_page(page.command(), &views));
        return Ok(());
    }

    let examples = page.examples();
    let output = PageOutput {
        command: page.command(),
        sections: &selected,
        examples: &examples,
    };
    println!("{}", format_page(&output, cli.format)?);
    Ok(())
}

fn acquire_page(cli: &Cli) -> Result<ManPage, String> {
    let command = cli.command.join(" ");

    let Some(path) = &cli.file else {
        let source = SystemManSource::new().with_timeout(Duration::from_secs(cli.timeout));
        return load_page(&source, &command).map_err(|err| err.to_string());
    };

    let raw = read_input(path)?;
    let command = if command.is_empty() {
        command_from_path(path)
    } else {
        command
    };
    let source = StaticManSource::new().with_page(command.clone(), strip_formatting(&raw));
    load_page(&source, &command).map_err(|err| err.to_string())
}

fn read_input(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        return Ok(raw);
    }
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

/// Command name implied by a manual file: `tar.txt` and `tar.1` both give
/// `tar`.
fn command_from_path(path: &Path) -> String {
    if path == Path::new("-") {
        return "stdin".to_string();
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("manual")
        .to_string()
}

fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ u64::from(std::process::id())
}
