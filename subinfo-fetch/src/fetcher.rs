//! Single-subscription fetch.
//!
//! One fetch makes up to two requests against the same URL: the first
//! reads the usage header, the second reads the body for the node list.
//! Only the first can fail the result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use subinfo_core::{FetchResult, NodeSummary, USAGE_HEADER, UsageInfo, validate_url};
use tracing::{debug, instrument, warn};

use crate::context::FetchContext;
use crate::decode::PayloadDecoder;
use crate::error::{FetchError, HttpError};
use crate::host::HttpResponse;

/// Fetches one subscription and turns every fault into a `Failure`.
#[derive(Debug, Clone)]
pub struct SubscriptionFetcher {
    ctx: Arc<FetchContext>,
    decoder: Arc<PayloadDecoder>,
}

impl SubscriptionFetcher {
    /// Creates a fetcher with the standard decoder chain.
    pub fn new(ctx: Arc<FetchContext>) -> Self {
        Self::with_decoder(ctx, PayloadDecoder::standard())
    }

    /// Creates a fetcher with a custom decoder chain.
    pub fn with_decoder(ctx: Arc<FetchContext>, decoder: PayloadDecoder) -> Self {
        Self {
            ctx,
            decoder: Arc::new(decoder),
        }
    }

    /// Fetches `url`. Never fails: errors become `FetchResult::Failure`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let start = Instant::now();
        match self.try_fetch(url).await {
            Ok(result) => {
                debug!(duration = ?start.elapsed(), "Fetch succeeded");
                result
            }
            Err(error) => {
                warn!(error = %error, duration = ?start.elapsed(), "Fetch failed");
                FetchResult::failure(url, error.reason())
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        validate_url(url)?;

        let response = self.get(url, self.ctx.settings.request_timeout).await?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status));
        }

        let header = response
            .header(USAGE_HEADER)
            .ok_or(FetchError::MissingUsageHeader)?;
        let usage = UsageInfo::from_header(&header)?;
        debug!(used = usage.used(), total = usage.total, "Parsed usage header");

        let display_name = self.ctx.display_name(url);
        let node = self.fetch_nodes(url).await;

        Ok(FetchResult::Success {
            url: url.to_string(),
            display_name,
            usage,
            node,
        })
    }

    /// Second request for the node list. Any fault here degrades to `None`.
    async fn fetch_nodes(&self, url: &str) -> Option<NodeSummary> {
        match self.get(url, self.ctx.settings.node_timeout).await {
            Ok(response) if response.is_ok() => self.decoder.decode(&response.body),
            Ok(response) => {
                debug!(status = response.status, "Node request returned non-200");
                None
            }
            Err(error) => {
                debug!(error = %error, "Node request failed");
                None
            }
        }
    }

    /// GET with a hard deadline around the whole exchange.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        tokio::time::timeout(timeout, self.ctx.http.get(url, timeout))
            .await
            .map_err(|_| HttpError::Timeout(timeout))?
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedHttp};

    fn fetcher(http: ScriptedHttp) -> SubscriptionFetcher {
        let ctx = FetchContext::builder()
            .http(Arc::new(http))
            .names(crate::names::NameMapping::parse("a.example=Airport A"))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        SubscriptionFetcher::new(Arc::new(ctx))
    }

    #[tokio::test]
    async fn test_success_with_nodes() {
        let http = ScriptedHttp::new().route(
            "https://a.example/sub",
            Reply::ok("proxies:\n  - name: Tokyo 1\n").usage("upload=100;download=200;total=1000;expire=0"),
        );

        let result = fetcher(http).fetch("https://a.example/sub").await;
        let FetchResult::Success {
            display_name,
            usage,
            node,
            ..
        } = result
        else {
            panic!("expected success");
        };
        assert_eq!(display_name, "Airport A");
        assert_eq!(usage.used(), 300);
        assert_eq!(usage.remaining(), 700);
        assert!((usage.percent_used() - 30.0).abs() < f64::EPSILON);
        assert!(usage.is_permanent());
        assert_eq!(node, Some(NodeSummary::new(1, "日本:1")));
    }

    #[tokio::test]
    async fn test_non_200_fails() {
        let http = ScriptedHttp::new().route("https://b.example/sub", Reply::status(404));
        let result = fetcher(http).fetch("https://b.example/sub").await;
        assert_eq!(result, FetchResult::failure("https://b.example/sub", "HTTP 404"));
    }

    #[tokio::test]
    async fn test_missing_header_fails() {
        let http = ScriptedHttp::new().route("https://b.example/sub", Reply::ok("proxies: []"));
        let result = fetcher(http).fetch("https://b.example/sub").await;
        assert_eq!(result.reason(), Some("no usage header"));
    }

    #[tokio::test]
    async fn test_garbage_header_fails() {
        let http = ScriptedHttp::new().route(
            "https://b.example/sub",
            Reply::ok("").usage("upload=1; total=lots"),
        );
        let result = fetcher(http).fetch("https://b.example/sub").await;
        assert_eq!(result.reason(), Some("invalid usage header: total"));
    }

    #[tokio::test]
    async fn test_undecodable_body_keeps_success() {
        let http = ScriptedHttp::new().route(
            "https://b.example/sub",
            Reply::ok("<html></html>").usage("total=10"),
        );
        let result = fetcher(http).fetch("https://b.example/sub").await;
        assert!(result.is_success());
        let FetchResult::Success { display_name, node, .. } = result else {
            unreachable!()
        };
        assert_eq!(display_name, "Unknown");
        assert!(node.is_none());
    }

    #[tokio::test]
    async fn test_failed_node_request_keeps_success() {
        let http = ScriptedHttp::new().route_sequence(
            "https://a.example/sub",
            vec![Reply::ok("").usage("total=10"), Reply::status(500)],
        );
        let result = fetcher(http).fetch("https://a.example/sub").await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_deadline_becomes_failure() {
        let http = ScriptedHttp::new().route(
            "https://slow.example/sub",
            Reply::ok("").usage("total=10").delay(Duration::from_secs(5)),
        );
        let start = Instant::now();
        let result = fetcher(http).fetch("https://slow.example/sub").await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(result.reason(), Some("timed out after 200ms"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_request() {
        let http = ScriptedHttp::new();
        let calls = http.calls();
        let result = fetcher(http).fetch("not a url").await;
        assert!(result.reason().unwrap().starts_with("invalid URL"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
