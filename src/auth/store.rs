//! Token store
//!
//! Owns the cached token and the mutual-exclusion discipline around
//! reading and refreshing it. All reads and writes of the token go
//! through the lock; at most one login is in flight at a time.

use super::types::AuthFlow;
use crate::error::Result;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

/// Lock-guarded cache of the authentication token.
///
/// The token is never handed out by reference; callers get an owned copy
/// valid at the moment of the read.
pub struct TokenStore {
    /// Login strategy used when the cache is empty
    flow: AuthFlow,
    /// Cached token, absent until the first login or after invalidation
    cached: RwLock<Option<String>>,
    /// HTTP client for login requests
    http: Client,
}

impl TokenStore {
    /// Create a new store with the given flow and HTTP client
    pub fn new(flow: AuthFlow, http: Client) -> Self {
        Self {
            flow,
            cached: RwLock::new(None),
            http,
        }
    }

    /// Return the cached token, logging in first if the cache is empty.
    ///
    /// Uses the double-checked pattern: a fast read-locked path, then a
    /// re-check under the write lock so concurrent callers never issue
    /// duplicate logins. While one login is in flight, other callers
    /// block on the lock.
    pub async fn get(&self) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                return Ok(token.clone());
            }
        }

        let mut cached = self.cached.write().await;

        // Double-check after acquiring the write lock (another task might
        // have logged in already)
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        debug!("token cache empty, logging in");
        let token = self.flow.login(&self.http).await?;
        *cached = Some(token.clone());

        Ok(token)
    }

    /// Clear the cached token so the next `get` re-authenticates.
    ///
    /// Called by the executor when the service reports token expiry.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.write().await;
        *cached = None;
    }

    /// Whether a token is currently cached
    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
