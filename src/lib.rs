//! # recordkit
//!
//! A client library for paginated, rate-limited record APIs guarded by
//! short-lived authentication tokens.
//!
//! ## Features
//!
//! - **Token Lifecycle**: cached token behind a lock, transparent
//!   re-authentication when the service reports expiry
//! - **Pluggable Login**: OAuth password grant or service login-form
//!   exchange, selected at construction
//! - **Concurrent Pagination**: fan-out page fetching under a strict
//!   worker ceiling, with first-error-wins draining
//! - **Rate Limiting**: token bucket via governor to stay under service
//!   throttling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recordkit::{
//!     AuthFlow, Client, ClientConfig, Credentials, QueryConfig, QueryPages, QueryRunner,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> recordkit::Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.example.com/api")
//!         .auth(AuthFlow::OauthPassword {
//!             token_url: "https://login.example.com/services/oauth2/token".into(),
//!             credentials: Credentials::new("cid", "secret", "me@example.com", "pw"),
//!         })
//!         .build()?;
//!     let client = Arc::new(Client::new(config)?);
//!
//!     // Stream every page of a record query through a sink
//!     let source = Arc::new(QueryPages::new(client, "record/v4/do/query", "record"));
//!     let runner = QueryRunner::new(QueryConfig::default());
//!     runner
//!         .run(source, vec!["id".into(), "email".into()], |page| {
//!             println!("page: {} bytes", page.len());
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! QueryRunner ──▶ PageSource ──▶ Client ──▶ TokenStore/AuthFlow ──▶ HTTP
//!     ▲               │             │
//!     └── pages/EOF/errors ◀────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Token store and login flows
pub mod auth;

/// Endpoint descriptors
pub mod endpoint;

/// Request executor with rate limiting and envelope classification
pub mod client;

/// Concurrent pagination
pub mod query;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthFlow, AuthHeaderFormat, Credentials, TokenStore};
pub use client::{Client, ClientConfig, RateLimiter, RateLimiterConfig};
pub use endpoint::{Endpoint, RawEndpoint};
pub use error::{Error, Result};
pub use query::{PageOutcome, PageRequest, PageSource, QueryConfig, QueryPages, QueryRunner};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
