use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use iffclip_cli::{ClipConfig, ClipContext, ClipError, Commands, commands};

#[derive(Parser)]
#[command(
    name = "iffclip",
    about = "Move text and IFF files through numbered clipboard units",
    version,
    long_about = "Copies text (as FORM FTXT) and IFF interchange files onto one of 256 \
                  clipboard units kept in a directory, and pastes them back out."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "IFFCLIP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the clipboard units
    #[arg(long, global = true, env = "IFFCLIP_DIR")]
    clips_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ClipConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let ctx = ClipContext::new(config, cli.clips_dir.as_deref())
        .context("failed to open clipboard device")?;
    commands::dispatch(&ctx, &cli.command)?;
    Ok(())
}

/// One-line diagnostic from an error chain.
///
/// Library errors already render their source, so a cause whose text ends
/// the message so far is not repeated.
fn diagnostic(err: &anyhow::Error) -> String {
    err.chain()
        .map(ToString::to_string)
        .reduce(|message, cause| {
            if message.ends_with(&cause) {
                message
            } else {
                format!("{message}: {cause}")
            }
        })
        .unwrap_or_default()
}

/// One-line diagnostic from an argument error, without clap's usage block
fn usage_diagnostic(err: &clap::Error) -> String {
    if matches!(
        err.kind(),
        clap::error::ErrorKind::MissingSubcommand
            | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        return "a subcommand is required (see --help)".to_string();
    }
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            eprintln!("iffclip: {}", usage_diagnostic(&err));
            return ExitCode::FAILURE;
        }
        // --help and --version
        Err(err) => {
            return match err.print() {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
    };

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays clean
    let level = Level::from(cli.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(clip) = err.downcast_ref::<ClipError>() {
                debug!(kind = ?clip.kind(), "command failed");
            }
            eprintln!("iffclip: {}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}
