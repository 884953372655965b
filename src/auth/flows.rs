//! Login flow implementations
//!
//! Each flow performs one unauthenticated exchange and yields a fresh
//! token. Flows never retry; retry-on-expiry is the request executor's
//! responsibility.

use super::types::AuthFlow;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// OAuth token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Login endpoint response body.
///
/// The service reuses its error envelope here: on failure the token is
/// absent and `err` carries the reason.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    err: Option<String>,
}

impl AuthFlow {
    /// Perform the login exchange and return a fresh token
    pub(crate) async fn login(&self, http: &Client) -> Result<String> {
        match self {
            AuthFlow::OauthPassword {
                token_url,
                credentials,
            } => {
                debug!(url = %token_url, "requesting token via oauth password grant");
                let form = [
                    ("grant_type", "password"),
                    ("client_id", credentials.client_id.as_str()),
                    ("client_secret", credentials.client_secret.as_str()),
                    ("username", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                ];

                let response = http
                    .post(token_url)
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| Error::auth(format!("issuing login request: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::auth(format!(
                        "token request failed with status {status}: {body}"
                    )));
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::auth(format!("decoding token response: {e}")))?;
                Ok(token.access_token)
            }

            AuthFlow::LoginForm {
                login_url,
                user_key,
                credentials,
            } => {
                debug!(url = %login_url, "requesting token via login form");
                let form = [
                    ("email", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                    ("user_key", user_key.as_str()),
                ];

                let response = http
                    .post(login_url)
                    .query(&[("format", "json")])
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| Error::auth(format!("issuing login request: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::auth(format!(
                        "login request failed with status {status}: {body}"
                    )));
                }

                let login: LoginResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::auth(format!("decoding login response: {e}")))?;

                if let Some(err) = login.err {
                    return Err(Error::auth(err));
                }

                login
                    .api_key
                    .ok_or_else(|| Error::auth("login response carried no token"))
            }
        }
    }
}
