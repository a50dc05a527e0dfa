//! Crawl engine
//!
//! The worker-facing pieces of the crawler: page fetching, the per-URL
//! crawl lifecycle, retriable backoff, and the supervisor that runs the
//! worker pool against the shared frontier.

mod backoff;
mod coordinator;
mod fetcher;
mod worker;

pub use backoff::BackoffPolicy;
pub use coordinator::{run_crawl, run_crawl_with};
pub use fetcher::{extract_links, FetchError, FetchResult, HtmlFetcher, PageFetcher, RETRIABLE_STATUS};
pub use worker::DomainCrawler;
