//! Crawl supervision: worker pool, seeding and drain
//!
//! The supervisor seeds the frontier with the start URL, runs a pool of
//! crawl workers, and shuts the pool down either when the frontier drains
//! or when the process is interrupted.

use crate::crawler::fetcher::{HtmlFetcher, PageFetcher};
use crate::crawler::worker::DomainCrawler;
use crate::frontier::{FrontierQueue, RedisFrontier};
use crate::output::{OutputSink, StdoutSink};
use crate::robots::RobotsAuthority;
use crate::{Config, CrawlerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Bound on the whole join wait, counted from the first join attempt.
/// Workers still running when it elapses are aborted.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(10);

/// Runs a crawl to completion with production collaborators.
///
/// Constructs the Redis frontier, the HTML fetcher, the robots authority
/// and the stdout sink from `config`, then drives the worker pool until the
/// frontier drains. Ctrl-C propagates cancellation to every worker.
pub async fn run_crawl(config: Config) -> Result<(), CrawlerError> {
    let frontier: Arc<dyn FrontierQueue> = Arc::new(RedisFrontier::connect(&config.redis)?);
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HtmlFetcher::new(
        &config.user_agent,
        Duration::from_millis(config.timeout_ms),
    )?);
    let robots = Arc::new(RobotsAuthority::new(
        &config.user_agent,
        Duration::from_millis(config.robots_timeout_ms),
    )?);
    let sink: Arc<dyn OutputSink> = Arc::new(StdoutSink::new());

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping workers");
            signal_cancel.cancel();
        }
    });

    let result = run_crawl_with(&config, frontier.clone(), fetcher, robots, sink, cancel).await;
    frontier.close();
    result
}

/// Runs the crawl loop against injected collaborators.
///
/// Exposed separately so tests can drive the pool with their own frontier,
/// fetcher, sink and cancellation token.
pub async fn run_crawl_with(
    config: &Config,
    frontier: Arc<dyn FrontierQueue>,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<RobotsAuthority>,
    sink: Arc<dyn OutputSink>,
    cancel: CancellationToken,
) -> Result<(), CrawlerError> {
    let admitted = frontier.push(&config.start_url).await?;
    if !admitted {
        tracing::info!(
            "seed URL {} already admitted, joining the existing crawl",
            config.start_url
        );
    }

    let crawler = Arc::new(DomainCrawler::new(
        config,
        frontier.clone(),
        fetcher,
        robots,
        sink,
    ));
    let active = Arc::new(AtomicUsize::new(0));
    let brpop_timeout = Duration::from_secs(config.redis.brpop_timeout);

    let mut workers = JoinSet::new();
    for id in 0..config.concurrency {
        workers.spawn(worker_loop(
            id,
            crawler.clone(),
            frontier.clone(),
            active.clone(),
            cancel.clone(),
            brpop_timeout,
        ));
    }

    // One deadline bounds the whole join wait, whether the workers exit on
    // a natural drain or because cancellation fired. Stragglers are aborted
    // when it elapses.
    let drain = async {
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::error!("worker panicked: {}", e);
                }
            }
        }
    };
    let drained = tokio::time::timeout(SHUTDOWN_DEADLINE, drain).await.is_ok();
    if !drained {
        tracing::warn!(
            "shutdown deadline elapsed, aborting {} remaining workers",
            workers.len()
        );
        workers.shutdown().await;
    }

    tracing::info!("crawl loop finished");
    Ok(())
}

/// One worker's pop loop.
///
/// Drain detection: when a non-blocking pop finds nothing, the worker falls
/// back to a blocking pop bounded by `brpop_timeout`. If that also yields
/// nothing and no peer worker is mid-crawl, nothing can enqueue new work
/// any more and the worker exits.
async fn worker_loop(
    id: u32,
    crawler: Arc<DomainCrawler>,
    frontier: Arc<dyn FrontierQueue>,
    active: Arc<AtomicUsize>,
    cancel: CancellationToken,
    brpop_timeout: Duration,
) {
    tracing::debug!("worker {} started", id);
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let popped = tokio::select! {
            _ = cancel.cancelled() => break,
            result = frontier.pop() => result,
        };
        let url = match popped {
            Ok(Some(url)) => url,
            Ok(None) => {
                let blocked = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = frontier.pop_blocking(brpop_timeout) => result,
                };
                match blocked {
                    Ok(Some(url)) => url,
                    Ok(None) => {
                        if active.load(Ordering::SeqCst) == 0 {
                            tracing::debug!("worker {} found the frontier drained", id);
                            break;
                        }
                        continue;
                    }
                    Err(e) => {
                        tracing::error!("worker {}: frontier error: {}", id, e);
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::error!("worker {}: frontier error: {}", id, e);
                break;
            }
        };

        active.fetch_add(1, Ordering::SeqCst);
        crawler.crawl(&url, &cancel).await;
        active.fetch_sub(1, Ordering::SeqCst);
    }
    tracing::debug!("worker {} exiting", id);
}
