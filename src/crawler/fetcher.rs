//! Page fetching and link extraction
//!
//! The crawler consumes pages through the [`PageFetcher`] seam: a fetch
//! either yields the set of absolute URLs found in the page's anchors or a
//! typed failure. HTTP 429/502/503/504 are surfaced as
//! [`FetchError::RetriableStatus`]; every other failure is permanent for the
//! URL in question.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HTTP statuses that trigger backoff instead of an error log
pub const RETRIABLE_STATUS: [u16; 4] = [429, 502, 503, 504];

/// Failure modes of a page fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// The origin asked us to slow down or is struggling; worth damping
    /// load before the next crawl.
    #[error("retriable HTTP status {0}")]
    RetriableStatus(u16),

    /// Any other non-success status; the URL is dropped.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response is not an HTML document.
    #[error("content is not HTML: {content_type}")]
    ContentMismatch { content_type: String },

    /// Transport-level failure: DNS, connect, timeout, body read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for fetch operations
pub type FetchResult = Result<HashSet<String>, FetchError>;

/// Source of pages for the crawl workers.
///
/// Implementations must return fully-resolved absolute URLs; relative hrefs
/// are resolved against the fetched page before they are returned.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the absolute link targets found in it.
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Production fetcher: HTTP GET with a per-page timeout, HTML-only.
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    /// Builds the fetcher's HTTP client.
    ///
    /// Redirects are followed by the client; links are resolved against the
    /// final URL so that relative hrefs on a redirected page point where the
    /// browser would take them.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HtmlFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        if RETRIABLE_STATUS.contains(&status) {
            return Err(FetchError::RetriableStatus(status));
        }
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch { content_type });
        }

        let base = response.url().clone();
        let body = response.text().await?;

        Ok(extract_links(&body, &base))
    }
}

/// Extracts the absolute targets of all `<a href>` anchors in a document.
///
/// Relative hrefs are resolved against `base`; empty, fragment-only and
/// non-HTTP(S) targets are dropped. The returned set is deduplicated by
/// exact URL string.
pub fn extract_links(html: &str, base: &Url) -> HashSet<String> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base) {
                    links.insert(absolute);
                }
            }
        }
    }

    links
}

/// Resolves one href to an absolute HTTP(S) URL, or drops it.
fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
