//! Client configuration

use super::rate_limit::RateLimiterConfig;
use crate::auth::{AuthFlow, AuthHeaderFormat};
use crate::error::{Error, Result};
use std::time::Duration;

/// Configuration for the client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all endpoint paths are joined against
    pub base_url: String,
    /// Login strategy
    pub auth: AuthFlow,
    /// Auth header template
    pub header_format: AuthHeaderFormat,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Rate limiter configuration, None disables limiting
    pub rate_limit: Option<RateLimiterConfig>,
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for client config
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    auth: Option<AuthFlow>,
    header_format: Option<AuthHeaderFormat>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    rate_limit: Option<RateLimiterConfig>,
    no_rate_limit: bool,
}

impl ClientConfigBuilder {
    /// Set the base URL (required)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the login strategy (required)
    pub fn auth(mut self, auth: AuthFlow) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the auth header template
    pub fn header_format(mut self, format: AuthHeaderFormat) -> Self {
        self.header_format = Some(format);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.no_rate_limit = true;
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::config("base_url is required"))?;
        let auth = self.auth.ok_or_else(|| Error::config("auth is required"))?;

        let rate_limit = if self.no_rate_limit {
            None
        } else {
            Some(self.rate_limit.unwrap_or_default())
        };

        Ok(ClientConfig {
            base_url,
            auth,
            header_format: self.header_format.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| format!("recordkit/{}", env!("CARGO_PKG_VERSION"))),
            rate_limit,
        })
    }
}
