use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.start_url.is_empty() {
        return Err(ConfigError::Validation(
            "startUrl must not be empty".to_string(),
        ));
    }

    let parsed = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid startUrl '{}': {}", config.start_url, e)))?;
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "startUrl '{}' has no host",
            config.start_url
        )));
    }

    if config.concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be at least 1, got {}",
            config.concurrency
        )));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeoutMs must be positive".to_string(),
        ));
    }

    if config.max_depth == 0 {
        return Err(ConfigError::Validation(
            "maxDepth must be positive".to_string(),
        ));
    }

    if config.backoff_base_ms == 0 {
        return Err(ConfigError::Validation(
            "backoffBaseMs must be positive".to_string(),
        ));
    }

    if config.backoff_max_ms == 0 {
        return Err(ConfigError::Validation(
            "backoffMaxMs must be positive".to_string(),
        ));
    }

    if config.backoff_base_ms > config.backoff_max_ms {
        return Err(ConfigError::Validation(format!(
            "backoffBaseMs ({}) must not exceed backoffMaxMs ({})",
            config.backoff_base_ms, config.backoff_max_ms
        )));
    }

    if config.backoff_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "backoffRetries must be at least 1, got {}",
            config.backoff_retries
        )));
    }

    if config.robots_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "robotsTimeoutMs must be positive".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "userAgent must not be empty".to_string(),
        ));
    }

    if config.redis.host.is_empty() {
        return Err(ConfigError::Validation(
            "redis.host must not be empty".to_string(),
        ));
    }

    if config.redis.queue_key.is_empty() || config.redis.visited_set_key.is_empty() {
        return Err(ConfigError::Validation(
            "redis queue and visited-set keys must not be empty".to_string(),
        ));
    }

    // BRPOP treats a zero timeout as "block forever", which would defeat
    // drain detection.
    if config.redis.brpop_timeout == 0 {
        return Err(ConfigError::Validation(
            "redis.brpopTimeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}
