//! Parsed robots.txt rules
//!
//! Wraps the robotstxt matcher in a rules object with an explicit allow-all
//! sentinel for hosts whose robots.txt could not be obtained.

use robotstxt::DefaultMatcher;

/// Robots directives for one origin, matched against a user-agent token.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt body (empty means allow all)
    content: String,

    /// Allow-all sentinel used when the file could not be fetched
    allow_all: bool,
}

impl RobotsRules {
    /// Rules parsed from a fetched robots.txt body.
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// The fail-open sentinel: every URL is allowed.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks whether a URL is allowed for the given user-agent token.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
