// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `SubInfo` CLI - batch usage checks for proxy subscription links.
//!
//! # Examples
//!
//! ```bash
//! # Check links given as arguments (free text is fine, links are extracted)
//! subinfo https://a.example/sub?token=1 https://b.example/api/v1/client
//!
//! # Read links from a text file and from stdin
//! subinfo -i links.txt
//! cat links.txt | subinfo --stdin
//!
//! # JSON output
//! subinfo --format json --pretty -i links.txt
//!
//! # Plain text, no markup
//! subinfo --plain https://a.example/sub
//!
//! # Inspect configuration
//! subinfo config show
//! ```

mod commands;
mod delivery;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, config};

// ============================================================================
// CLI Definition
// ============================================================================

/// `SubInfo` CLI - subscription usage checker.
#[derive(Parser)]
#[command(name = "subinfo")]
#[command(about = "Batch usage checker for proxy subscription links")]
#[command(long_about = r#"
SubInfo queries proxy/VPN subscription links concurrently and reports
traffic used, quota remaining, expiry date and a node breakdown per link.

Links are taken from arguments, text files (-i) and stdin (--stdin).
Duplicates are checked once. Long reports are written to a file.

Examples:
  subinfo https://a.example/sub       # One link
  subinfo -i links.txt                # Links from a file
  subinfo --format json -i links.txt  # JSON output
  subinfo config show                 # Effective settings
"#)]
#[command(version)]
#[command(author = "SubInfo Contributors")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'check' with the given links.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Links and options for the default 'check' command.
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check subscription links (default if no command specified).
    #[command(visible_alias = "c")]
    Check(check::CheckArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// At least one link succeeded, or a non-check command finished.
    Success = 0,
    /// General error.
    Error = 1,
    /// No links found in the input.
    NoUrls = 2,
    /// Every link failed.
    AllFailed = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let default_filter = if verbose {
        "subinfo=debug,info"
    } else {
        "subinfo=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Check(args)) => check::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => check::run(&cli.check, &cli).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_links_run_check() {
        let cli = Cli::try_parse_from(["subinfo", "https://a.example/sub", "--limit", "100"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.check.urls, vec!["https://a.example/sub"]);
        assert_eq!(cli.check.limit, Some(100));
    }

    #[test]
    fn test_subcommands_and_globals() {
        let cli = Cli::try_parse_from(["subinfo", "config", "path", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(_))));
        assert_eq!(cli.format, OutputFormat::Json);

        let cli = Cli::try_parse_from(["subinfo", "check", "-i", "links.txt", "--no-mapping"]).unwrap();
        let Some(Commands::Check(args)) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.input, vec![PathBuf::from("links.txt")]);
        assert!(args.no_mapping);
    }
}
