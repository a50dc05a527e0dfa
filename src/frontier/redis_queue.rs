//! Redis-backed frontier implementation
//!
//! Pending URLs live in a list (LPUSH at the head, RPOP/BRPOP at the tail)
//! and the seen set in a Redis set. Admission runs a server-side Lua script
//! so the SADD and LPUSH succeed or fail together, across every process
//! sharing the store.

use crate::config::RedisConfig;
use crate::frontier::{FrontierQueue, FrontierResult};
use async_trait::async_trait;
use deadpool_redis::redis::{cmd, Script};
use deadpool_redis::{Config as RedisUrlConfig, Pool, PoolConfig, Runtime};
use std::time::Duration;

/// Upper bound on pooled connections per process. Each blocked worker holds
/// one connection for the duration of its BRPOP.
const MAX_POOL_SIZE: usize = 32;

/// Atomic admission: insert into the seen set and, only if the URL is new,
/// enqueue it. Returns the LPUSH result (> 0) for a new URL, 0 otherwise.
const ADMIT_SCRIPT: &str = "if redis.call('SADD', KEYS[2], ARGV[1]) == 1 \
                            then return redis.call('LPUSH', KEYS[1], ARGV[1]) \
                            else return 0 end";

/// The production [`FrontierQueue`], backed by a shared Redis instance.
///
/// Operations borrow a connection from a bounded pool for the duration of a
/// single command. The admission script is sent by SHA after the first call;
/// if the server has flushed its script cache, the `Script` helper reloads
/// and retries transparently.
pub struct RedisFrontier {
    pool: Pool,
    queue_key: String,
    visited_key: String,
    admit: Script,
}

impl RedisFrontier {
    /// Creates a frontier client for the configured endpoint.
    ///
    /// Connections are established lazily; a dead endpoint surfaces as an
    /// error on the first operation, not here.
    pub fn connect(config: &RedisConfig) -> FrontierResult<Self> {
        let url = format!("redis://{}:{}", config.host, config.port);
        let mut pool_config = RedisUrlConfig::from_url(url);
        pool_config.pool = Some(PoolConfig::new(MAX_POOL_SIZE));
        let pool = pool_config.create_pool(Some(Runtime::Tokio1))?;

        Ok(Self {
            pool,
            queue_key: config.queue_key.clone(),
            visited_key: config.visited_set_key.clone(),
            admit: Script::new(ADMIT_SCRIPT),
        })
    }
}

#[async_trait]
impl FrontierQueue for RedisFrontier {
    async fn push(&self, url: &str) -> FrontierResult<bool> {
        if url.is_empty() {
            return Ok(false);
        }
        let mut conn = self.pool.get().await?;
        let admitted: i64 = self
            .admit
            .key(&self.queue_key)
            .key(&self.visited_key)
            .arg(url)
            .invoke_async(&mut conn)
            .await?;
        Ok(admitted > 0)
    }

    async fn pop(&self) -> FrontierResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let url: Option<String> = cmd("RPOP")
            .arg(&self.queue_key)
            .query_async(&mut conn)
            .await?;
        Ok(url)
    }

    async fn pop_blocking(&self, timeout: Duration) -> FrontierResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let popped: Option<(String, String)> = cmd("BRPOP")
            .arg(&self.queue_key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        Ok(popped.map(|(_key, url)| url))
    }

    async fn size(&self) -> FrontierResult<u64> {
        let mut conn = self.pool.get().await?;
        let len: u64 = cmd("LLEN")
            .arg(&self.queue_key)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    async fn has_seen(&self, url: &str) -> FrontierResult<bool> {
        if url.is_empty() {
            return Ok(false);
        }
        let mut conn = self.pool.get().await?;
        let seen: bool = cmd("SISMEMBER")
            .arg(&self.visited_key)
            .arg(url)
            .query_async(&mut conn)
            .await?;
        Ok(seen)
    }

    async fn visited_count(&self) -> FrontierResult<u64> {
        let mut conn = self.pool.get().await?;
        let count: u64 = cmd("SCARD")
            .arg(&self.visited_key)
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn clear(&self) -> FrontierResult<()> {
        let mut conn = self.pool.get().await?;
        cmd("DEL")
            .arg(&self.queue_key)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear_all(&self) -> FrontierResult<()> {
        let mut conn = self.pool.get().await?;
        cmd("DEL")
            .arg(&self.queue_key)
            .arg(&self.visited_key)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    fn close(&self) {
        self.pool.close();
    }
}
