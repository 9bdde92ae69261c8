//! In-memory `HttpGet` for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use subinfo_core::USAGE_HEADER;

use crate::error::HttpError;
use crate::host::{HttpGet, HttpResponse};

/// One scripted answer.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    status: u16,
    usage: Option<String>,
    body: String,
    delay: Duration,
}

impl Reply {
    pub(crate) fn ok(body: &str) -> Self {
        Self {
            status: 200,
            usage: None,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok("")
        }
    }

    pub(crate) fn usage(mut self, header: &str) -> Self {
        self.usage = Some(header.to_string());
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn to_response(&self) -> HttpResponse {
        let mut response = HttpResponse::new(self.status, self.body.clone());
        if let Some(usage) = &self.usage {
            response
                .headers
                .insert(USAGE_HEADER, HeaderValue::from_str(usage).unwrap());
        }
        response
    }
}

/// Replies for one URL. The last reply repeats.
struct Route {
    replies: Vec<Reply>,
    next: AtomicUsize,
}

/// Decrements the in-flight gauge even when the request is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scripted HTTP host. Unknown URLs fail with a connection error.
#[derive(Default)]
pub(crate) struct ScriptedHttp {
    routes: HashMap<String, Route>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ScriptedHttp {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, url: &str, reply: Reply) -> Self {
        self.route_sequence(url, vec![reply])
    }

    pub(crate) fn route_sequence(mut self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                replies,
                next: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Total number of requests seen.
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Highest number of simultaneous requests seen.
    pub(crate) fn peak(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }
}

#[async_trait]
impl HttpGet for ScriptedHttp {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let Some(route) = self.routes.get(url) else {
            return Err(HttpError::Connect(url.to_string()));
        };
        let index = route
            .next
            .fetch_add(1, Ordering::SeqCst)
            .min(route.replies.len().saturating_sub(1));
        let Some(reply) = route.replies.get(index) else {
            return Err(HttpError::Connect(url.to_string()));
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(reply.to_response())
    }
}
