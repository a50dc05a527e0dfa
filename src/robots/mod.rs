//! robots.txt authority
//!
//! Per-origin fetch, parse and cache of robots.txt, with fail-open
//! semantics: when the file cannot be obtained the origin is treated as
//! allow-all. Entries are created lazily on the first URL seen for an
//! origin and live for the process lifetime.

mod cache;

pub use cache::RobotsRules;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// Decides whether URLs may be crawled according to their origin's
/// robots.txt, for a fixed user-agent token.
pub struct RobotsAuthority {
    client: reqwest::Client,
    user_agent: String,
    cache: RwLock<HashMap<String, Arc<RobotsRules>>>,
}

impl RobotsAuthority {
    /// Builds an authority with its own HTTP client bounded by `timeout`
    /// per robots.txt fetch.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Checks whether `url` may be crawled.
    ///
    /// A URL without a parseable host is never allowed. On the first URL for
    /// an origin the robots.txt is fetched and the parsed rules installed;
    /// racing fetches for the same origin are harmless, the first install
    /// wins and the rest are dropped.
    pub async fn is_allowed(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) if parsed.host_str().is_some() => parsed,
            _ => return false,
        };
        let origin = parsed.origin().ascii_serialization();

        if let Some(rules) = self.cache.read().await.get(&origin).cloned() {
            return rules.is_allowed(url, &self.user_agent);
        }

        let fetched = Arc::new(self.fetch_rules(&origin).await);
        let rules = {
            let mut cache = self.cache.write().await;
            cache.entry(origin).or_insert(fetched).clone()
        };
        rules.is_allowed(url, &self.user_agent)
    }

    /// Fetches and parses `<origin>/robots.txt`.
    ///
    /// Any failure (timeout, refused connection, unreadable body) yields the
    /// allow-all sentinel; so does a non-success status, matching the
    /// convention that a missing robots.txt permits crawling.
    async fn fetch_rules(&self, origin: &str) -> RobotsRules {
        let robots_url = format!("{}/robots.txt", origin);
        tracing::debug!("fetching {}", robots_url);

        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => RobotsRules::from_content(&body),
                Err(e) => {
                    tracing::warn!("unreadable robots.txt body for {}: {}, allowing all", origin, e);
                    RobotsRules::allow_all()
                }
            },
            Ok(response) => {
                tracing::debug!(
                    "no robots.txt for {} (status {}), allowing all",
                    origin,
                    response.status()
                );
                RobotsRules::allow_all()
            }
            Err(e) => {
                tracing::warn!("robots.txt fetch failed for {}: {}, allowing all", origin, e);
                RobotsRules::allow_all()
            }
        }
    }

    /// Installs rules for an origin without fetching.
    #[cfg(test)]
    pub(crate) async fn preload(&self, origin: &str, rules: RobotsRules) {
        self.cache
            .write()
            .await
            .insert(origin.to_string(), Arc::new(rules));
    }
}
