//! Request executor
//!
//! Builds and issues one HTTP call per endpoint descriptor and classifies
//! the service's error envelope. Token expiry (envelope code 1) is the
//! only condition recovered from here: the cached token is invalidated
//! and the call is replayed exactly once with a fresh one.

use super::config::ClientConfig;
use super::rate_limit::RateLimiter;
use crate::auth::{AuthHeaderFormat, TokenStore};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Content type the service expects on every request
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Error envelope decoded from every 2xx response body.
///
/// `err` absent means success; when present, the numeric code under
/// `@attributes` selects the failure class.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    err: Option<String>,
    #[serde(default, rename = "@attributes")]
    attributes: Option<EnvelopeAttributes>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeAttributes {
    #[serde(default)]
    err_code: Option<i64>,
}

/// Envelope codes with dedicated handling
const CODE_TOKEN_EXPIRED: i64 = 1;
const CODE_LOGIN_FAILED: i64 = 15;
const CODE_INVALID_PAYLOAD: i64 = 71;

/// Client for an authenticated record API.
///
/// Owns the token store; all auth state lives here, never in globals.
/// Cheap to share behind an `Arc` across worker tasks.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    header_format: AuthHeaderFormat,
    tokens: TokenStore,
    rate_limiter: Option<RateLimiter>,
}

impl Client {
    /// Create a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;
        Self::with_http_client(config, http)
    }

    /// Create a client that issues requests through a caller-supplied
    /// `reqwest::Client` (custom TLS, proxies, timeout policy)
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join treats a path without a trailing slash as a file
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let tokens = TokenStore::new(config.auth, http.clone());

        Ok(Self {
            http,
            base_url,
            header_format: config.header_format,
            tokens,
            rate_limiter,
        })
    }

    /// The token store backing this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Execute an endpoint and return the raw response bytes.
    ///
    /// The query string always carries `format=json` in addition to the
    /// endpoint's own parameters.
    pub async fn execute(&self, endpoint: &dyn Endpoint) -> Result<Bytes> {
        let method = endpoint.method();
        let url = self.base_url.join(&endpoint.path())?;
        let query = endpoint.query()?;
        let body = endpoint.body()?;

        let mut refreshed = false;
        loop {
            // The replay after a token refresh is a second request and
            // counts against the quota like any other
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let token = self.tokens.get().await?;

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header(
                    self.header_format.header_name.as_str(),
                    self.header_format.render(&token),
                );
            for (name, value) in &self.header_format.extra_headers {
                req = req.header(name.as_str(), value.as_str());
            }

            req = req.query(&query).query(&[("format", "json")]);

            if let Some(body) = &body {
                req = req.body(body.clone());
            }

            let response = req.send().await.map_err(Error::Http)?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await.map_err(Error::Http)?;

            if !matches!(status, 200 | 201 | 204) {
                return Err(Error::http_status(
                    status,
                    String::from_utf8_lossy(&bytes).into_owned(),
                ));
            }

            // 204 and friends carry no envelope
            if bytes.is_empty() {
                debug!(%method, %url, status, "request succeeded");
                return Ok(bytes);
            }

            let envelope: ErrorEnvelope = serde_json::from_slice(&bytes)?;
            let Some(message) = envelope.err else {
                debug!(%method, %url, status, "request succeeded");
                return Ok(bytes);
            };

            let code = envelope
                .attributes
                .unwrap_or_default()
                .err_code
                .unwrap_or(0);
            match code {
                CODE_TOKEN_EXPIRED if !refreshed => {
                    // One silent replay with a fresh token; a second
                    // expiry report for the same logical call is terminal
                    warn!(%url, "token expired, re-authenticating");
                    self.tokens.invalidate().await;
                    refreshed = true;
                }
                CODE_TOKEN_EXPIRED => {
                    return Err(Error::remote(CODE_TOKEN_EXPIRED, message));
                }
                CODE_LOGIN_FAILED => return Err(Error::login_failed(message)),
                CODE_INVALID_PAYLOAD => return Err(Error::invalid_payload(message)),
                _ => return Err(Error::remote(code, message)),
            }
        }
    }

    /// Execute an endpoint and decode the response as JSON
    pub async fn call_json<T: DeserializeOwned>(&self, endpoint: &dyn Endpoint) -> Result<T> {
        let bytes = self.execute(endpoint).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
