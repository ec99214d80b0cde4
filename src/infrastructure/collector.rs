//! Collector engine
//!
//! Drives every HTTP exchange of a workflow. A collector runs in one of two
//! modes:
//!
//! - [`CollectorMode::SingleFlight`]: one request at a time, no pacing. Used
//!   by single-page workflows that must finish parsing before returning.
//! - [`CollectorMode::Fanout`]: up to `parallelism` requests in flight per
//!   domain, each spaced by the configured delay. Used by listing workflows
//!   that issue one detail request per card.
//!
//! Requests are never retried. A failed request is handed to its handler as
//! an `Err` and the handler decides what survives.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::domain::CorrelationToken;
use crate::infrastructure::collector_error::CollectorError;
use crate::infrastructure::http_client::{PageFetcher, PageRequest};
use crate::infrastructure::response_cache::ResponseCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorMode {
    SingleFlight,
    Fanout { parallelism: usize },
}

impl CollectorMode {
    /// Requests allowed in flight per domain, never less than one.
    pub fn parallelism(self) -> usize {
        match self {
            Self::SingleFlight => 1,
            Self::Fanout { parallelism } => parallelism.max(1),
        }
    }

    pub const fn is_paced(self) -> bool {
        matches!(self, Self::Fanout { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub mode: CollectorMode,
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

/// Per-domain concurrency and spacing.
struct DomainGates {
    parallelism: usize,
    permits: Mutex<HashMap<String, Arc<Semaphore>>>,
    spacing: Option<DefaultKeyedRateLimiter<String>>,
}

impl DomainGates {
    fn new(mode: CollectorMode, delay: Duration) -> Self {
        let spacing = if mode.is_paced() {
            Quota::with_period(delay).map(RateLimiter::keyed)
        } else {
            None
        };
        Self {
            parallelism: mode.parallelism(),
            permits: Mutex::new(HashMap::new()),
            spacing,
        }
    }

    fn semaphore(&self, domain: &str) -> Arc<Semaphore> {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            permits
                .entry(domain.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.parallelism))),
        )
    }

    async fn pace(&self, domain: &str) {
        if let Some(limiter) = &self.spacing {
            limiter.until_key_ready(&domain.to_string()).await;
        }
    }
}

/// Shared request path used by both visits and spawned follow-ups.
struct RequestExecutor {
    fetcher: Arc<dyn PageFetcher>,
    cache: Option<Arc<ResponseCache>>,
    gates: DomainGates,
    timeout: Duration,
}

impl RequestExecutor {
    async fn execute(&self, request: &PageRequest) -> Result<String, CollectorError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.load(request).await {
                return Ok(body);
            }
        }

        let domain = request.domain();
        let semaphore = self.gates.semaphore(&domain);
        let _permit = semaphore.acquire_owned().await.map_err(|_| CollectorError::Closed {
            url: request.url.clone(),
        })?;
        self.gates.pace(&domain).await;

        debug!("Requesting {} {}", request.method, request.url);
        let body = tokio::time::timeout(self.timeout, self.fetcher.fetch(request))
            .await
            .map_err(|_| CollectorError::timeout(&request.url, self.timeout))??;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(request, &body).await {
                warn!("Failed to cache {}: {}", request.url, e);
            }
        }
        Ok(body)
    }
}

pub struct Collector {
    executor: Arc<RequestExecutor>,
    in_flight: JoinSet<()>,
}

impl Collector {
    pub fn new(fetcher: Arc<dyn PageFetcher>, cache: Option<Arc<ResponseCache>>, options: &CollectorOptions) -> Self {
        Self {
            executor: Arc::new(RequestExecutor {
                fetcher,
                cache,
                gates: DomainGates::new(options.mode, options.request_delay),
                timeout: options.request_timeout,
            }),
            in_flight: JoinSet::new(),
        }
    }

    /// Fetch an entry page and return its body to the caller.
    pub async fn visit(&self, url: &str) -> Result<String, CollectorError> {
        let request = PageRequest::get(url);
        self.executor.execute(&request).await.inspect_err(|e| {
            warn!("Visit failed: {}", e);
        })
    }

    /// Issue a follow-up request in the background.
    ///
    /// The handler receives the correlation token together with the outcome
    /// once the request completes; it runs on the runtime, concurrently with
    /// other handlers. Failures are logged here before the handler sees them.
    pub fn request<T, H, F>(&mut self, request: PageRequest, token: CorrelationToken<T>, on_response: H)
    where
        T: Send + 'static,
        H: FnOnce(CorrelationToken<T>, Result<String, CollectorError>) -> F + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let executor = Arc::clone(&self.executor);
        self.in_flight.spawn(async move {
            let outcome = executor.execute(&request).await;
            if let Err(e) = &outcome {
                warn!("Detail request {} for post {} failed: {}", token.id(), token.post_id(), e);
            }
            on_response(token, outcome).await;
        });
    }

    pub fn outstanding(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait until every outstanding request and its handler has finished.
    pub async fn wait(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            if let Err(e) = joined {
                warn!("Response handler aborted: {}", e);
            }
        }
    }
}
