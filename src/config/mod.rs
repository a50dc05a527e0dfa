//! Configuration loading and validation
//!
//! Configuration comes from a YAML file plus environment-variable overrides
//! for the Redis endpoint and key layout. Both the file path and the
//! programmatic constructor produce the same validated, immutable [`Config`].

mod parser;
mod types;
mod validation;

pub use parser::{apply_env_overrides, load_config, load_config_with_env};
pub use types::{Config, RedisConfig};
pub use validation::validate;
