use serde::Deserialize;

/// Crawler configuration, immutable once validated
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed URL; its host defines the crawled domain
    pub start_url: String,

    /// Number of concurrent crawl workers per process
    pub concurrency: u32,

    /// Per-page fetch timeout in milliseconds
    pub timeout_ms: u64,

    /// Reserved: validated but not consulted by the crawl loop
    pub max_depth: u32,

    /// Initial backoff delay in milliseconds
    pub backoff_base_ms: u64,

    /// Upper bound on the backoff delay in milliseconds
    pub backoff_max_ms: u64,

    /// Uniform additive jitter in [0, backoffJitterMs] milliseconds
    pub backoff_jitter_ms: u64,

    /// Maximum number of backoff sleeps per retriable failure
    pub backoff_retries: u32,

    /// robots.txt fetch timeout in milliseconds
    pub robots_timeout_ms: u64,

    /// User-agent token, also used for robots.txt matching
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Coordination-store endpoint and key layout
    pub redis: RedisConfig,
}

/// Redis endpoint and frontier key configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedisConfig {
    pub host: String,

    pub port: u16,

    /// List key holding pending URLs
    #[serde(default = "default_queue_key")]
    pub queue_key: String,

    /// Set key holding every URL ever admitted
    #[serde(default = "default_visited_set_key")]
    pub visited_set_key: String,

    /// Blocking-pop timeout in seconds, used for drain detection
    #[serde(default = "default_brpop_timeout")]
    pub brpop_timeout: u64,
}

fn default_user_agent() -> String {
    "monzo-crawler".to_string()
}

fn default_queue_key() -> String {
    "frontier:queue".to_string()
}

fn default_visited_set_key() -> String {
    "frontier:visited".to_string()
}

fn default_brpop_timeout() -> u64 {
    5
}

impl RedisConfig {
    /// Endpoint with default frontier keys, mainly for tests and tools.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            queue_key: default_queue_key(),
            visited_set_key: default_visited_set_key(),
            brpop_timeout: default_brpop_timeout(),
        }
    }
}
