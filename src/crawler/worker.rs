//! Per-URL crawl lifecycle
//!
//! One popped URL flows through: same-domain gate, robots gate, fetch,
//! link filtering, record emission, and finally admission of the surviving
//! links back into the frontier.

use crate::crawler::backoff::BackoffPolicy;
use crate::crawler::fetcher::{FetchError, PageFetcher, RETRIABLE_STATUS};
use crate::frontier::FrontierQueue;
use crate::output::OutputSink;
use crate::robots::RobotsAuthority;
use crate::url::{host, same_domain};
use crate::Config;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Crawls pages belonging to the seed URL's domain.
///
/// The worker is stateless between URLs; all shared state lives in the
/// frontier, the robots cache and the sink, so any number of workers (and
/// processes) can run the same lifecycle concurrently.
pub struct DomainCrawler {
    seed_host: Option<String>,
    frontier: Arc<dyn FrontierQueue>,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<RobotsAuthority>,
    sink: Arc<dyn OutputSink>,
    backoff: BackoffPolicy,
}

impl DomainCrawler {
    pub fn new(
        config: &Config,
        frontier: Arc<dyn FrontierQueue>,
        fetcher: Arc<dyn PageFetcher>,
        robots: Arc<RobotsAuthority>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            seed_host: host(&config.start_url),
            frontier,
            fetcher,
            robots,
            sink,
            backoff: BackoffPolicy::from_config(config),
        }
    }

    /// Processes one URL popped from the frontier.
    ///
    /// Every failure path logs and returns; nothing here blocks the worker
    /// beyond a single backoff sequence.
    pub async fn crawl(&self, url: &str, cancel: &CancellationToken) {
        let page_host = host(url);
        if !same_domain(self.seed_host.as_deref(), page_host.as_deref()) {
            // The frontier should never contain off-domain URLs; this guard
            // protects against stores shared with a different seed.
            tracing::warn!(
                "skipping off-domain URL {} (host {:?}, seed {:?})",
                url,
                page_host,
                self.seed_host
            );
            return;
        }

        if !self.robots.is_allowed(url).await {
            tracing::info!("robots.txt disallows {}", url);
            return;
        }

        let links = match self.fetcher.fetch(url).await {
            Ok(links) => links,
            Err(FetchError::RetriableStatus(status)) if RETRIABLE_STATUS.contains(&status) => {
                self.backoff.damp(status, cancel).await;
                return;
            }
            Err(FetchError::RetriableStatus(status)) => {
                tracing::warn!("non-retriable HTTP {} for {}", status, url);
                return;
            }
            Err(e) => {
                tracing::error!("fetch failed for {}: {}", url, e);
                return;
            }
        };

        // Pre-admission filter: same domain and robots-allowed, deduplicated
        // within the page. The frontier's push does the cross-process part.
        let mut filtered = BTreeSet::new();
        for link in links {
            if same_domain(self.seed_host.as_deref(), host(&link).as_deref())
                && self.robots.is_allowed(&link).await
            {
                filtered.insert(link);
            }
        }
        let sorted: Vec<String> = filtered.into_iter().collect();

        if let Err(e) = self.sink.emit(url, &sorted) {
            tracing::error!("failed to emit record for {}: {}", url, e);
        }

        for link in &sorted {
            match self.frontier.push(link).await {
                // A false return means the URL was already seen; expected.
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("frontier push failed for {}: {}", link, e);
                    return;
                }
            }
        }
    }
}
