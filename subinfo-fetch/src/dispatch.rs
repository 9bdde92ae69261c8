//! Bounded concurrent fan-out over a batch of URLs.
//!
//! Every URL runs on its own task and holds one semaphore permit for the
//! whole fetch. Results land in a slot indexed by input position, so the
//! returned list follows input order regardless of completion order.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use subinfo_core::FetchResult;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::fetcher::SubscriptionFetcher;

/// Runs a [`SubscriptionFetcher`] over many URLs under a concurrency cap.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    fetcher: SubscriptionFetcher,
    limit: usize,
}

impl BatchDispatcher {
    /// Creates a dispatcher. A limit of zero is raised to one.
    pub fn new(fetcher: SubscriptionFetcher, limit: usize) -> Self {
        Self {
            fetcher,
            limit: limit.max(1),
        }
    }

    /// Creates a dispatcher using the context's `max_concurrent`.
    pub fn from_context(ctx: Arc<FetchContext>) -> Self {
        let limit = ctx.settings.max_concurrent;
        Self::new(SubscriptionFetcher::new(ctx), limit)
    }

    /// Returns the concurrency cap.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetches every URL and returns one result per URL, in input order.
    ///
    /// A task that panics yields a `Failure` for its URL; siblings are
    /// unaffected.
    #[instrument(skip(self, urls), fields(count = urls.len(), limit = self.limit))]
    pub async fn dispatch(&self, urls: &[String]) -> Vec<FetchResult> {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut pending = FuturesUnordered::new();

        for (index, url) in urls.iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            let task_url = url.clone();

            let handle = tokio::spawn(async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                fetcher.fetch(&task_url).await
            });
            pending.push(async move { (index, handle.await) });
        }

        let mut slots: Vec<Option<FetchResult>> = vec![None; urls.len()];
        while let Some((index, joined)) = pending.next().await {
            let result = joined.unwrap_or_else(|e| {
                warn!(index, error = %e, "Fetch task aborted");
                FetchResult::failure(&urls[index], format!("task failed: {e}"))
            });
            debug!(index, success = result.is_success(), "Slot filled");
            slots[index] = Some(result);
        }

        let results: Vec<FetchResult> = slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| slot.unwrap_or_else(|| FetchResult::failure(url, "not fetched")))
            .collect();

        let ok = results.iter().filter(|r| r.is_success()).count();
        info!(
            ok,
            failed = results.len() - ok,
            duration = ?start.elapsed(),
            "Batch complete"
        );
        results
    }
}

/// Fetches `urls` with at most `limit` in flight, preserving input order.
pub async fn dispatch(ctx: Arc<FetchContext>, urls: &[String], limit: usize) -> Vec<FetchResult> {
    BatchDispatcher::new(SubscriptionFetcher::new(ctx), limit)
        .dispatch(urls)
        .await
}

// ============================================================================
// Tests
// ============================================================================
