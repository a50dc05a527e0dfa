use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads, parses and validates a YAML configuration file.
///
/// Absent required fields, an empty file and malformed YAML are all errors;
/// configuration problems are never recoverable at runtime.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use monzo_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler-config.yaml")).unwrap();
/// println!("Seed: {}", config.start_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = serde_yaml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Loads a configuration file and applies environment-variable overrides.
///
/// This is the startup path used by the binary: the YAML file is parsed,
/// `REDIS_HOST`, `REDIS_PORT`, `MDC_QUEUE_KEY`, `MDC_VISITED_SET_KEY` and
/// `MDC_BRPOP_TIMEOUT` are applied on top, and the result is validated.
pub fn load_config_with_env(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = serde_yaml::from_str(&content)?;
    apply_env_overrides(&mut config)?;

    validate(&config)?;

    Ok(config)
}

/// Applies coordination-store overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_overrides(config, |var| std::env::var(var).ok())
}

/// Override application against an arbitrary variable source.
///
/// Separated from [`apply_env_overrides`] so tests can drive it without
/// mutating process-wide environment state.
fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("REDIS_HOST") {
        config.redis.host = host;
    }

    if let Some(port) = lookup("REDIS_PORT") {
        config.redis.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            var: "REDIS_PORT".to_string(),
            value: port,
        })?;
    }

    if let Some(key) = lookup("MDC_QUEUE_KEY") {
        config.redis.queue_key = key;
    }

    if let Some(key) = lookup("MDC_VISITED_SET_KEY") {
        config.redis.visited_set_key = key;
    }

    if let Some(timeout) = lookup("MDC_BRPOP_TIMEOUT") {
        config.redis.brpop_timeout = timeout.parse().map_err(|_| ConfigError::InvalidEnv {
            var: "MDC_BRPOP_TIMEOUT".to_string(),
            value: timeout,
        })?;
    }

    Ok(())
}
