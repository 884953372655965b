//! Request executor module
//!
//! The `Client` attaches auth headers from the token store, issues the
//! HTTP call, classifies the service's error envelope, and retries once
//! transparently on token expiry. Rate limiting uses a governor token
//! bucket so the library stays under the service's request ceiling.

mod config;
mod executor;
mod rate_limit;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use executor::Client;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
