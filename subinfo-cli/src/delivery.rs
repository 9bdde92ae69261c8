//! Report delivery.
//!
//! Short reports are printed. Reports at or above the inline limit are
//! written as plain text to `result_<unix>.txt` and only a notice is
//! printed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use subinfo_core::{DeliveryMode, FetchResult, RenderMode, ReportAssembler};
use subinfo_store::ensure_dir;
use tracing::info;

/// How to deliver a report.
#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    /// Inline limit in characters.
    pub inline_limit: usize,
    /// Directory for file reports.
    pub output_dir: PathBuf,
    /// Print inline reports without markup.
    pub plain: bool,
}

/// What was delivered.
#[derive(Debug)]
pub struct Delivered {
    /// Delivery mode that was chosen.
    pub mode: DeliveryMode,
    /// Text for stdout: the report, or a notice naming the file.
    pub stdout: String,
    /// The report file, for file delivery.
    pub file: Option<PathBuf>,
}

/// File name for a report written at `unix` seconds.
pub fn report_file_name(unix: i64) -> String {
    format!("result_{unix}.txt")
}

async fn write_report(dir: &Path, text: &str) -> Result<PathBuf> {
    ensure_dir(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(report_file_name(Utc::now().timestamp()));
    tokio::fs::write(&path, text)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Renders and delivers a report.
pub async fn deliver(results: &[FetchResult], options: &DeliveryOptions) -> Result<Delivered> {
    let assembler = ReportAssembler::new(options.inline_limit);
    let report = assembler.assemble(results);

    match report.mode {
        DeliveryMode::Inline => {
            let stdout = if options.plain {
                assembler.render(results, RenderMode::Plain)
            } else {
                report.text
            };
            Ok(Delivered {
                mode: DeliveryMode::Inline,
                stdout,
                file: None,
            })
        }
        DeliveryMode::File => {
            let path = write_report(&options.output_dir, &report.text).await?;
            info!(path = %path.display(), chars = report.text.chars().count(), "Report written to file");
            let ok = results.iter().filter(|r| r.is_success()).count();
            Ok(Delivered {
                mode: DeliveryMode::File,
                stdout: format!(
                    "Report too long for inline display ({} subscriptions, {} ok). Saved to {}",
                    results.len(),
                    ok,
                    path.display()
                ),
                file: Some(path),
            })
        }
    }
}
