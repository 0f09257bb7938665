//! Command-line interface for the pyuml utility
//!
//! Provides a CLI to turn Python source files into class diagrams.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::tty::IsTty;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::colorizer::colorize_output;
use pyuml::core::logging::init_logging;
use pyuml::prelude::*;

/// Default PNG path when `--output` is omitted
pub const DEFAULT_OUTPUT: &str = "class_diagram.png";

/// Pyuml - Generate class diagrams from Python code
#[derive(Parser)]
#[command(name = "pyuml")]
#[command(about = "Generate class diagrams from Python code")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error), defaults to PYUML_LOG_LEVEL, RUST_LOG or warn
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a class diagram from a Python file
    Run {
        /// Python file to analyze (use - for stdin)
        input: PathBuf,

        /// Output PNG path (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the diagram in the terminal instead of saving it
        #[arg(short, long)]
        show: bool,

        /// Character set for the terminal diagram
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// Pixel scale factor for the PNG
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=8))]
        scale: u32,

        /// Maximum number of columns in the class grid
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        columns: u64,

        /// Title drawn above the diagram
        #[arg(long, conflicts_with = "no_title")]
        title: Option<String>,

        /// Draw the diagram without a title
        #[arg(long)]
        no_title: bool,

        /// When to use colors in terminal output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// List the classes, members and relationships found in a Python file
    Inspect {
        /// Python file to analyze (use - for stdin)
        input: PathBuf,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported terminal character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Machine-readable form of the `inspect` command
#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    total_classes: usize,
    relationships: Vec<Inheritance>,
    classes: &'a [ClassInfo],
}

/// Main CLI application
pub struct PyumlApp {
    extractor: PythonExtractor,
}

impl PyumlApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self {
            extractor: PythonExtractor::new(),
        }
    }

    fn build_config(
        style: StyleChoice,
        scale: u32,
        columns: u64,
        title: Option<String>,
        no_title: bool,
    ) -> RenderConfig {
        let config = RenderConfig::new()
            .with_style(style.into())
            .with_scale(scale)
            .with_max_columns(usize::try_from(columns).unwrap_or(usize::MAX));

        match (title, no_title) {
            (_, true) => config.with_title(None),
            (Some(title), false) => config.with_title(Some(title)),
            (None, false) => config,
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables fill in whatever the flags leave unset
        if let Err(e) = init_logging(
            cli.log_level.map(|level| level.as_str()),
            cli.log_format.map(|format| format.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("pyuml v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Run {
                input,
                output,
                show,
                style,
                scale,
                columns,
                title,
                no_title,
                color,
            } => {
                let config = Self::build_config(style, scale, columns, title, no_title);
                self.run_command(input, output, show, config, color, cli.verbose)
            }
            Commands::Inspect { input, json } => self.inspect_command(input, json, cli.verbose),
        }
    }

    /// Handle the run command
    fn run_command(
        &self,
        input: PathBuf,
        output: Option<PathBuf>,
        show: bool,
        config: RenderConfig,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(&input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let result = self.extract(&input, &content)?;
        debug!(classes = result.len(), "Extracted class model");

        if show {
            let text = TextRenderer::with_config(config.clone())
                .render(&result)
                .map_err(|e| Self::render_failure(e, &input))?;
            // stdout already carries the PNG bytes
            if output.as_deref().is_some_and(is_stdio) {
                let text = if self.should_colorize(color, &io::stderr()) {
                    colorize_output(&text)
                } else {
                    text
                };
                write_text(io::stderr().lock(), &text)?;
            } else {
                let text = if self.should_colorize(color, &io::stdout()) {
                    colorize_output(&text)
                } else {
                    text
                };
                self.write_output(&text)?;
            }
        }

        // --show alone only displays; an explicit --output still saves
        let target = match (output, show) {
            (Some(path), _) => Some(path),
            (None, false) => Some(PathBuf::from(DEFAULT_OUTPUT)),
            (None, true) => None,
        };

        if let Some(path) = target {
            self.write_png(&result, &path, &config, &input)?;
            info!(path = %path.display(), "Diagram written");
            if verbose {
                eprintln!("Diagram saved to {}", path.display());
            }
        }

        Ok(())
    }

    /// Handle the inspect command
    fn inspect_command(&self, input: PathBuf, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(&input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let result = self.extract(&input, &content)?;

        if json {
            let report = InspectReport {
                total_classes: result.len(),
                relationships: result.inheritance().collect(),
                classes: result.classes(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            self.write_output(&format_details(&result))?;
        }

        Ok(())
    }

    /// Extract the class model, naming the input on failure
    pub fn extract(&self, input: &Path, content: &str) -> Result<ParseResult> {
        self.extractor
            .extract(content)
            .with_context(|| format!("Failed to parse '{}'", display_name(input)))
    }

    fn render_failure(error: RenderError, input: &Path) -> anyhow::Error {
        if error.is_empty_diagram() {
            anyhow!("No classes found in '{}'", display_name(input))
        } else {
            anyhow::Error::new(error)
        }
    }

    /// Render the diagram as PNG into a file, or stdout for `-`
    fn write_png(
        &self,
        result: &ParseResult,
        path: &Path,
        config: &RenderConfig,
        input: &Path,
    ) -> Result<()> {
        if is_stdio(path) {
            let bytes = pyuml::render_with_config(result, config)
                .map_err(|e| Self::render_failure(e, input))?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            return Ok(());
        }

        pyuml::save_png_with_config(result, path, config).map_err(|e| match e {
            RenderError::Io { source } => anyhow!(
                "Failed to write output file '{}': {}",
                path.display(),
                source
            ),
            other => Self::render_failure(other, input),
        })
    }

    /// Determine if output to `stream` should be colorized
    fn should_colorize(&self, color: ColorChoice, stream: &impl IsTty) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                stream.is_tty()
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: &Path) -> Result<String> {
        if is_stdio(input) {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read standard input")?;
            Ok(content)
        } else {
            fs::read_to_string(input)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", input.display(), e))
        }
    }

    /// Write text to stdout, ending with a newline
    pub fn write_output(&self, content: &str) -> Result<()> {
        write_text(io::stdout().lock(), content)
    }
}

impl Default for PyumlApp {
    fn default() -> Self {
        Self::new()
    }
}

/// `-` stands for stdin as input and stdout as output
fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn write_text(mut out: impl Write, content: &str) -> Result<()> {
    out.write_all(content.as_bytes())?;
    if !content.is_empty() && !content.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn display_name(input: &Path) -> String {
    if is_stdio(input) {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

/// Human-readable class details
pub fn format_details(result: &ParseResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total classes: {}\n", result.len()));

    let relationships: Vec<Inheritance> = result.inheritance().collect();
    out.push_str(&format!("Relationships: {}\n", relationships.len()));
    for relation in &relationships {
        out.push_str(&format!(
            "  {} inherits from {}\n",
            relation.child, relation.parent
        ));
    }

    for class in result.classes() {
        out.push_str(&format!("\nClass: {} (line {})\n", class.name, class.line));

        out.push_str("  Attributes:\n");
        push_items(&mut out, class.attributes.iter().cloned(), "No attributes");

        out.push_str("  Methods:\n");
        push_items(
            &mut out,
            class.methods.iter().map(|method| method.signature()),
            "No methods",
        );

        out.push_str("  Parents:\n");
        push_items(&mut out, class.bases.iter().cloned(), "No parent classes");
    }

    out
}

fn push_items(out: &mut String, items: impl Iterator<Item = String>, empty: &str) {
    let mut any = false;
    for item in items {
        out.push_str(&format!("    - {}\n", item));
        any = true;
    }
    if !any {
        out.push_str(&format!("    - {}\n", empty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const SOURCE: &str = "class Animal:\n    def __init__(self, name):\n        self.name = name\n\nclass Dog(Animal, Mixin):\n    def bark(self):\n        pass\n";

    #[test]
    fn test_cli_parsing_run_command() {
        let args = vec![
            "pyuml", "run", "zoo.py", "--output", "zoo.png", "--style", "ascii",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Run {
                input,
                output,
                show,
                style,
                scale,
                columns,
                title,
                no_title,
                color,
            } => {
                assert_eq!(input.to_string_lossy(), "zoo.py");
                assert_eq!(output.unwrap().to_string_lossy(), "zoo.png");
                assert!(!show);
                assert_eq!(style, StyleChoice::Ascii);
                assert_eq!(scale, 2); // default
                assert_eq!(columns, 5); // default
                assert!(title.is_none());
                assert!(!no_title);
                assert_eq!(color, ColorChoice::Auto); // default
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parsing_short_flags() {
        let cli = Cli::try_parse_from(["pyuml", "run", "a.py", "-s", "-o", "a.png"]).unwrap();

        match cli.command {
            Commands::Run { output, show, .. } => {
                assert!(show);
                assert_eq!(output.unwrap().to_string_lossy(), "a.png");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["pyuml", "run"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_scale_and_columns() {
        assert!(Cli::try_parse_from(["pyuml", "run", "a.py", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["pyuml", "run", "a.py", "--columns", "0"]).is_err());
    }

    #[test]
    fn test_title_conflicts_with_no_title() {
        let args = ["pyuml", "run", "a.py", "--title", "Zoo", "--no-title"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let cli = Cli::try_parse_from(["pyuml", "inspect", "-", "--json"]).unwrap();

        match cli.command {
            Commands::Inspect { input, json } => {
                assert_eq!(input.to_string_lossy(), "-");
                assert!(json);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = ["pyuml", "inspect", "a.py", "--verbose", "--log-level", "debug"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.log_format.is_none());
    }

    #[test]
    fn test_build_config() {
        let config = PyumlApp::build_config(StyleChoice::Ascii, 3, 2, None, false);
        assert_eq!(config.style, CharacterSet::Ascii);
        assert_eq!(config.scale, 3);
        assert_eq!(config.max_columns, 2);
        assert_eq!(config.title.as_deref(), Some("Class Diagram"));

        let titled = PyumlApp::build_config(StyleChoice::Unicode, 1, 1, Some("Zoo".into()), false);
        assert_eq!(titled.title.as_deref(), Some("Zoo"));

        let untitled = PyumlApp::build_config(StyleChoice::Unicode, 1, 1, None, true);
        assert!(untitled.title.is_none());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = PyumlApp::new();

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("zoo.py");
        fs::write(&file_path, SOURCE).unwrap();

        let content = app.read_input(&file_path).unwrap();
        assert_eq!(content, SOURCE);
    }

    #[test]
    fn test_read_missing_input_names_the_file() {
        let app = PyumlApp::default();
        let err = app.read_input(Path::new("does/not/exist.py")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.py"));
    }

    #[test]
    fn test_parse_failure_names_the_input() {
        let app = PyumlApp::new();
        let err = app.extract(Path::new("bad.py"), "class (:\n").unwrap_err();

        assert!(err.to_string().contains("bad.py"));
        assert!(format!("{:#}", err).contains("Parse error"));
    }

    #[test]
    fn test_run_writes_png() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("zoo.py");
        let output = dir.path().join("zoo.png");
        fs::write(&input, SOURCE).unwrap();

        let app = PyumlApp::new();
        app.run_command(
            input,
            Some(output.clone()),
            false,
            RenderConfig::default(),
            ColorChoice::Never,
            false,
        )
        .unwrap();

        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_run_without_classes_fails_distinctly() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("helpers.py");
        let output = dir.path().join("helpers.png");
        fs::write(&input, "def helper():\n    return 1\n").unwrap();

        let app = PyumlApp::new();
        let err = app
            .run_command(
                input,
                Some(output.clone()),
                false,
                RenderConfig::default(),
                ColorChoice::Never,
                false,
            )
            .unwrap_err();

        assert!(err.to_string().starts_with("No classes found"));
        assert!(!output.exists());
    }

    #[test]
    fn test_dash_means_standard_streams() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("./-")));
        assert!(!is_stdio(Path::new("out.png")));
    }

    #[test]
    fn test_write_text_ends_with_newline() {
        let mut out = Vec::new();
        write_text(&mut out, "┌─┐").unwrap();
        assert_eq!(out, "┌─┐\n".as_bytes());

        let mut empty = Vec::new();
        write_text(&mut empty, "").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_format_details() {
        let result = pyuml::extract(SOURCE).unwrap();
        let details = format_details(&result);

        assert!(details.starts_with("Total classes: 2\n"));
        assert!(details.contains("Relationships: 1\n"));
        assert!(details.contains("  Dog inherits from Animal\n"));
        assert!(!details.contains("inherits from Mixin"));
        assert!(details.contains("Class: Animal (line 1)"));
        assert!(details.contains("    - name\n"));
        assert!(details.contains("    - __init__(name)\n"));
        assert!(details.contains("    - No parent classes\n"));
        assert!(details.contains("    - No attributes\n"));
        assert!(details.contains("    - Mixin\n"));
    }

    #[test]
    fn test_inspect_report_json() {
        let result = pyuml::extract(SOURCE).unwrap();
        let report = InspectReport {
            total_classes: result.len(),
            relationships: result.inheritance().collect(),
            classes: result.classes(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_classes"], 2);
        assert_eq!(value["relationships"][0]["child"], "Dog");
        assert_eq!(value["relationships"][0]["parent"], "Animal");
        assert_eq!(value["classes"][1]["bases"][1], "Mixin");
    }
}
