//! Report rendering.
//!
//! Turns an ordered list of [`FetchResult`]s into one text report. Rendering
//! comes in two flavours: HTML-style markup for inline chat delivery and
//! plain text for file attachments. When the markup form reaches the inline
//! limit, [`ReportAssembler::assemble`] switches to a plain file report,
//! since chat transports reject oversized messages.

use std::borrow::Cow;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::format::format_bytes;
use crate::models::{FetchResult, NodeSummary, UsageInfo};

/// Default inline message ceiling, in characters.
pub const DEFAULT_INLINE_LIMIT: usize = 4000;

/// Number of cells in the usage bar.
const BAR_WIDTH: usize = 15;

/// Percent represented by one bar cell.
const PERCENT_PER_CELL: f64 = 6.6;

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Line between result blocks.
const SEPARATOR: &str = "———————————————";

/// Shown instead of a date for subscriptions without expiry.
pub const PERMANENT_LABEL: &str = "Unknown/Permanent";

// ============================================================================
// Modes
// ============================================================================

/// How text is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// `<b>`/`<code>` markup with escaped user text.
    #[default]
    Markup,
    /// No tags, no escaping.
    Plain,
}

/// How the caller should deliver the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Send as an inline message.
    Inline,
    /// Send as a text file attachment.
    File,
}

impl DeliveryMode {
    /// Picks the delivery mode for a rendered length.
    pub fn for_length(len: usize, limit: usize) -> Self {
        if len >= limit { Self::File } else { Self::Inline }
    }
}

/// A rendered report plus its delivery mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Delivery mode chosen for `text`.
    pub mode: DeliveryMode,
    /// Markup text for inline delivery, plain text for files.
    pub text: String,
}

// ============================================================================
// Assembler
// ============================================================================

/// Renders fetch results into a report.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    inline_limit: usize,
}

impl ReportAssembler {
    /// Creates an assembler with the given inline limit in characters.
    pub fn new(inline_limit: usize) -> Self {
        Self { inline_limit }
    }

    /// Returns the inline limit.
    pub fn inline_limit(&self) -> usize {
        self.inline_limit
    }

    /// Renders the results and picks a delivery mode.
    ///
    /// The markup rendering is measured; at or above the limit the report is
    /// re-rendered as plain text for file delivery.
    pub fn assemble(&self, results: &[FetchResult]) -> Report {
        let markup = self.render(results, RenderMode::Markup);
        match DeliveryMode::for_length(markup.chars().count(), self.inline_limit) {
            DeliveryMode::Inline => Report {
                mode: DeliveryMode::Inline,
                text: markup,
            },
            DeliveryMode::File => Report {
                mode: DeliveryMode::File,
                text: self.render(results, RenderMode::Plain),
            },
        }
    }

    /// Renders all results in order, separated by a fixed rule.
    pub fn render(&self, results: &[FetchResult], mode: RenderMode) -> String {
        let ok = results.iter().filter(|r| r.is_success()).count();
        let mut out = format!(
            "Queried {} subscription(s): {} ok, {} failed",
            results.len(),
            ok,
            results.len() - ok
        );

        for result in results {
            out.push('\n');
            out.push_str(SEPARATOR);
            out.push('\n');
            out.push_str(&self.render_block(result, mode));
        }
        out
    }

    /// Renders one result block.
    pub fn render_block(&self, result: &FetchResult, mode: RenderMode) -> String {
        let s = Style(mode);
        match result {
            FetchResult::Success {
                url,
                display_name,
                usage,
                node,
            } => self.render_success(&s, url, display_name, usage, node.as_ref()),
            FetchResult::Failure { url, reason } => format!(
                "❌ {}: {}\nFailed: {}",
                s.bold("Link"),
                s.code(url),
                s.escape(reason)
            ),
        }
    }

    fn render_success(
        &self,
        s: &Style,
        url: &str,
        name: &str,
        usage: &UsageInfo,
        node: Option<&NodeSummary>,
    ) -> String {
        let percent = usage.percent_used();
        let expiry = usage
            .expiry_date()
            .unwrap_or_else(|| PERMANENT_LABEL.to_string());

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "📄 {}: {}", s.bold("Provider"), s.code(name));
        let _ = writeln!(out, "🔗 {}: {}", s.bold("Subscription"), s.code(url));
        let _ = writeln!(
            out,
            "📊 {}: {}",
            s.bold("Traffic"),
            s.code(&format!("[{}] {percent:.2}%", progress_bar(percent)))
        );
        let _ = writeln!(
            out,
            "Total: {} | Remaining: {}",
            s.code(&format_bytes(usage.total)),
            s.code(&format_bytes(usage.remaining()))
        );
        let _ = writeln!(
            out,
            "Used: {} (↑{} ↓{})",
            s.code(&format_bytes(usage.used())),
            format_bytes(usage.upload),
            format_bytes(usage.download)
        );
        let _ = write!(out, "⏰ {}: {}", s.bold("Expires"), s.code(&expiry));

        if let Some(node) = node {
            let _ = write!(out, "\n🌐 {}: {}", s.bold("Nodes"), s.code(&node.to_string()));
        }
        out
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_INLINE_LIMIT)
    }
}

/// Formats the usage bar.
///
/// The bar fills one cell per 6.6 percent and clamps at full, so accounts
/// over quota still render a 15-cell bar.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(percent: f64) -> String {
    let filled = ((percent.max(0.0) / PERCENT_PER_CELL) as usize).min(BAR_WIDTH);
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(std::iter::repeat_n(BAR_FULL, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, BAR_WIDTH - filled));
    bar
}

/// Escapes `&`, `<` and `>` for markup output.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

// ========================================================================
// Style helpers
// ========================================================================

struct Style(RenderMode);

impl Style {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.0 {
            RenderMode::Markup => escape_markup(text),
            RenderMode::Plain => Cow::Borrowed(text),
        }
    }

    fn bold(&self, text: &str) -> String {
        match self.0 {
            RenderMode::Markup => format!("<b>{}</b>", escape_markup(text)),
            RenderMode::Plain => text.to_string(),
        }
    }

    fn code(&self, text: &str) -> String {
        match self.0 {
            RenderMode::Markup => format!("<code>{}</code>", escape_markup(text)),
            RenderMode::Plain => text.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
