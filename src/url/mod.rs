//! URL host utilities
//!
//! Host extraction and the same-domain rule that gates which links the
//! crawler is allowed to follow.

mod domain;

pub use domain::{host, same_domain};
