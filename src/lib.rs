//! Distributed single-domain web crawler.
//!
//! Starting from a seed URL, the crawler visits every reachable page on the
//! same registrable domain, extracts outbound links, and emits each visited
//! page together with its same-domain links. Any number of crawler processes
//! can run concurrently against a shared Redis instance; the frontier's
//! atomic admission guarantees that no URL is ever crawled twice.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: String, value: String },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, RedisConfig};
pub use crawler::run_crawl;
pub use url::{host, same_domain};
