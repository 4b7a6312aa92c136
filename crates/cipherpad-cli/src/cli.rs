#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use cipherpad_runtime::{CipherFormat, CipherSession, SegmentingService, Settings, render};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::script::{load_book, run_script};

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "CIPHERPAD_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "cipherpad",
    about = "Render cipher parts, inspect settings and replay editing sessions",
    version
)]
pub struct Cli {
    /// Log filter (`warn`, `debug`, `cipherpad.history=trace`, ...).
    #[arg(long, global = true, env = LOG_ENV, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render canonical parts in one or every format.
    Render(RenderArgs),

    /// List the canonical format names.
    Formats,

    /// Print the effective settings as JSON.
    Settings(SettingsArgs),

    /// Replay an editing script against a code book.
    Session(SessionArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Format name, e.g. `camel` or `4-letter`.
    #[arg(long, short, required_unless_present = "all", conflicts_with = "all")]
    pub format: Option<String>,

    /// Print every format as `name: value`.
    #[arg(long)]
    pub all: bool,

    /// Canonical parts, in order.
    #[arg(required = true)]
    pub parts: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings file; defaults are shown when it is missing or malformed.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// JSON code book: `{"codes": {...}, "traditional": {...}}`.
    #[arg(long)]
    pub book: PathBuf,

    /// Settings file for the initial format and variant conversion.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Treat unknown codes as errors instead of passing them through.
    #[arg(long)]
    pub strict: bool,

    /// Script file; standard input when omitted.
    pub script: Option<PathBuf>,
}

/// Install the stderr `tracing` subscriber.
///
/// An unparsable filter falls back to `warn`. Installing twice is a no-op.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Render(args) => run_render(&args, out),
        Commands::Formats => {
            for format in CipherFormat::ALL {
                writeln!(out, "{format}")?;
            }
            Ok(())
        }
        Commands::Settings(args) => run_settings(&args, out),
        Commands::Session(args) => run_session(&args, out),
    }
}

fn run_render(args: &RenderArgs, out: &mut dyn Write) -> Result<()> {
    if args.all {
        for format in CipherFormat::ALL {
            writeln!(out, "{format}: {}", render(&args.parts, format))?;
        }
        return Ok(());
    }
    let name = args.format.as_deref().unwrap_or_default();
    let format: CipherFormat = name.parse()?;
    writeln!(out, "{}", render(&args.parts, format))?;
    Ok(())
}

fn load_settings(path: Option<&PathBuf>) -> Settings {
    path.map_or_else(Settings::default, Settings::load_file_or_default)
}

fn run_settings(args: &SettingsArgs, out: &mut dyn Write) -> Result<()> {
    let settings = load_settings(args.file.as_ref());
    writeln!(out, "{}", settings.to_json_string()?)?;
    Ok(())
}

fn run_session(args: &SessionArgs, out: &mut dyn Write) -> Result<()> {
    let book = load_book(&args.book)?;
    let service = if args.strict {
        SegmentingService::strict(book)
    } else {
        SegmentingService::new(book)
    };
    let mut session = CipherSession::new(service, load_settings(args.settings.as_ref()));

    match &args.script {
        Some(path) => run_script(&mut session, BufReader::new(File::open(path)?), out),
        None => run_script(&mut session, io::stdin().lock(), out),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::error::CliError;

    fn run_to_string(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_single_format() {
        let args = ["cipherpad", "render", "--format", "camel", "ab", "cd", "ef"];
        let out = run_to_string(&args).unwrap();
        assert_eq!(out, "abCdEf\n");
    }

    #[test]
    fn render_all_formats() {
        let out = run_to_string(&["cipherpad", "render", "--all", "ab", "cd", "ef"]).unwrap();
        assert_eq!(
            out,
            concat!(
                "space: ab cd ef\n",
                "4-letter: abcd ef\n",
                "first-upper: AbCdEf\n",
                "pascal: AbCdEf\n",
                "camel: abCdEf\n",
            )
        );
    }

    #[test]
    fn unknown_format_exits_with_two() {
        let err = run_to_string(&["cipherpad", "render", "--format", "kebab", "ab"]).unwrap_err();
        assert!(matches!(err, CliError::Format(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn render_requires_a_format_choice() {
        assert!(Cli::try_parse_from(["cipherpad", "render", "ab"]).is_err());
        let both = ["cipherpad", "render", "--all", "--format", "space", "ab"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn formats_lists_canonical_names() {
        let out = run_to_string(&["cipherpad", "formats"]).unwrap();
        assert_eq!(out, "space\n4-letter\nfirst-upper\npascal\ncamel\n");
    }

    #[test]
    fn settings_without_file_prints_defaults() {
        let out = run_to_string(&["cipherpad", "settings"]).unwrap();
        let parsed = Settings::from_json_str(&out).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn settings_with_malformed_file_prints_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let path = path.to_str().unwrap();
        let out = run_to_string(&["cipherpad", "settings", "--file", path]).unwrap();
        assert_eq!(Settings::from_json_str(&out).unwrap(), Settings::default());
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::try_parse_from(["cipherpad", "formats", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
