//! Check command - query subscription links and report usage.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use subinfo_core::{dedupe_urls, extract_urls};
use subinfo_fetch::{BatchDispatcher, FetchContext, HttpClient};
use subinfo_store::Settings;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::delivery::{self, DeliveryOptions};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the check command.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Subscription links. Free text is accepted; links are extracted.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Text file(s) to read links from.
    #[arg(long, short, value_name = "FILE")]
    pub input: Vec<PathBuf>,

    /// Read links from stdin.
    #[arg(long)]
    pub stdin: bool,

    /// Maximum simultaneous requests.
    #[arg(long, short = 'j', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, short, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Remote name mapping list.
    #[arg(long, value_name = "URL", conflicts_with = "no_mapping")]
    pub mapping_url: Option<String>,

    /// Local name mapping file.
    #[arg(long, value_name = "FILE", conflicts_with = "no_mapping")]
    pub mapping_file: Option<PathBuf>,

    /// Skip loading the name mapping.
    #[arg(long)]
    pub no_mapping: bool,

    /// Reports at or above this many characters go to a file.
    #[arg(long, value_name = "CHARS")]
    pub limit: Option<usize>,

    /// Directory for file reports.
    #[arg(long, short, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the report without markup.
    #[arg(long)]
    pub plain: bool,
}

impl CheckArgs {
    /// Applies command-line overrides on top of file settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(n) = self.concurrency {
            settings.max_concurrent = n.max(1);
        }
        if let Some(secs) = self.timeout {
            settings.request_timeout_secs = secs.max(1);
            settings.node_timeout_secs = secs.max(1);
        }
        if let Some(url) = &self.mapping_url {
            settings.mapping_url = Some(url.clone());
            settings.mapping_file = None;
        }
        if let Some(path) = &self.mapping_file {
            settings.mapping_file = Some(path.clone());
        }
        if self.no_mapping {
            settings.mapping_url = None;
            settings.mapping_file = None;
        }
        if let Some(limit) = self.limit {
            settings.inline_limit = limit.max(1);
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
    }
}

/// Loads settings from `--config` or the default location.
///
/// An explicit path must be valid; the default location falls back to
/// defaults when broken.
pub async fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load_from(path)
            .await
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::load_or_default(&Settings::default_path()).await),
    }
}

/// Collects links from arguments, files and stdin, in that order, without
/// duplicates.
async fn collect_urls(args: &CheckArgs) -> Result<Vec<String>> {
    let mut urls: Vec<String> = args.urls.iter().flat_map(|arg| extract_urls(arg)).collect();

    for path in &args.input {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        urls.extend(extract_urls(&String::from_utf8_lossy(&bytes)));
    }

    let piped = args.urls.is_empty() && args.input.is_empty() && !std::io::stdin().is_terminal();
    if args.stdin || piped {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("reading stdin")?;
        urls.extend(extract_urls(&String::from_utf8_lossy(&buf)));
    }

    Ok(dedupe_urls(urls))
}

/// Runs the check command.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<ExitCode> {
    let mut settings = load_settings(cli).await?;
    args.apply(&mut settings);

    let urls = collect_urls(args).await?;
    if urls.is_empty() {
        if !cli.quiet {
            eprintln!("No subscription links found.");
        }
        return Ok(ExitCode::NoUrls);
    }
    info!(count = urls.len(), "Checking subscriptions");

    // The only fatal setup step: without a client nothing can run.
    let http = HttpClient::with_user_agent(&settings.user_agent)
        .context("creating HTTP client")?;

    let fetch_settings = settings.fetch_settings();
    let names = settings
        .mapping_source()
        .load(&http, fetch_settings.mapping_timeout)
        .await;
    debug!(entries = names.len(), "Name mapping ready");

    let ctx = FetchContext::builder()
        .http(Arc::new(http))
        .names(names)
        .settings(fetch_settings)
        .build()?;
    let results = BatchDispatcher::from_context(Arc::new(ctx))
        .dispatch(&urls)
        .await;

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_results(&results)?);
        }
        OutputFormat::Text => {
            let options = DeliveryOptions {
                inline_limit: settings.inline_limit,
                output_dir: settings.output_dir.clone(),
                plain: args.plain,
            };
            let delivered = delivery::deliver(&results, &options).await?;
            println!("{}", delivered.stdout);
        }
    }

    if results.iter().any(subinfo_core::FetchResult::is_success) {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::AllFailed)
    }
}

// ============================================================================
// Tests
// ============================================================================
