//! Retriable-failure backoff
//!
//! When an origin answers with a retriable status the worker sleeps through
//! an exponential, jittered delay sequence before returning to the pop
//! loop. The backoff is advisory only: it damps load on a struggling
//! origin, it does not retry the URL that failed.

use crate::config::Config;
use rand::Rng;
use std::cmp;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Exponential backoff with uniform additive jitter.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    base: Duration,
    max: Duration,
    jitter_ms: u64,
    retries: u32,
}

impl BackoffPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: Duration::from_millis(config.backoff_base_ms),
            max: Duration::from_millis(config.backoff_max_ms),
            jitter_ms: config.backoff_jitter_ms,
            retries: config.backoff_retries,
        }
    }

    /// Sleeps through the delay sequence: base, base*2, ... capped at max,
    /// for at most `retries` sleeps, each with jitter drawn from
    /// `[0, jitter_ms]`. Returns immediately if `cancel` fires mid-sleep.
    pub async fn damp(&self, status: u16, cancel: &CancellationToken) {
        let mut attempt = 1;
        let mut delay = self.base;

        while attempt <= self.retries && delay <= self.max {
            let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=self.jitter_ms));
            tracing::warn!(
                "HTTP {}: backing off {} ms ({}/{})",
                status,
                (delay + jitter).as_millis(),
                attempt,
                self.retries
            );

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = sleep(delay + jitter) => {}
            }

            delay = cmp::min(delay * 2, self.max);
            attempt += 1;
        }
    }
}
