//! Distributed crawl frontier
//!
//! The frontier is the shared queue of URLs awaiting a crawl plus the
//! monotone set of every URL ever admitted. Admission (`push`) is atomic
//! across processes: for any URL, exactly one `push` in the whole system
//! returns `true`, which is the property the crawler relies on to never
//! visit a page twice.

mod redis_queue;

pub use redis_queue::RedisFrontier;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by frontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("redis command failed: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("failed to create connection pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Shared queue of URLs to crawl with built-in cross-process deduplication.
///
/// *Seen* is the set of URLs ever admitted; *Pending* the subset not yet
/// dequeued. `push` admits a URL into both atomically or rejects it; `pop`
/// removes from Pending only, so a popped URL stays seen forever.
#[async_trait]
pub trait FrontierQueue: Send + Sync {
    /// Admits a URL if it has never been seen.
    ///
    /// Returns `true` if the URL was newly admitted, `false` if it was
    /// rejected (already seen, or empty). Rejection is the common case
    /// during a crawl and is not an error.
    async fn push(&self, url: &str) -> FrontierResult<bool>;

    /// Removes and returns the next pending URL, or `None` if the queue is
    /// currently empty. Never blocks.
    async fn pop(&self) -> FrontierResult<Option<String>>;

    /// Like [`pop`](Self::pop) but waits up to `timeout` for a URL to become
    /// available. Used by workers for drain detection.
    async fn pop_blocking(&self, timeout: Duration) -> FrontierResult<Option<String>>;

    /// Number of pending URLs; may be approximate under contention.
    async fn size(&self) -> FrontierResult<u64>;

    /// Whether the URL has ever been admitted.
    async fn has_seen(&self, url: &str) -> FrontierResult<bool>;

    /// Total number of URLs ever admitted.
    async fn visited_count(&self) -> FrontierResult<u64>;

    /// Empties the pending queue; the seen set is preserved.
    async fn clear(&self) -> FrontierResult<()>;

    /// Empties both the pending queue and the seen set.
    async fn clear_all(&self) -> FrontierResult<()>;

    /// Releases the store's connections. Further operations fail.
    fn close(&self);
}
