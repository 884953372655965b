//! Error types for recordkit
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Service-reported errors are classified by the numeric code carried in
//! the response envelope; only token expiry (code 1) is ever recovered
//! from, and that happens inside the request executor.

use thiserror::Error;

/// The main error type for recordkit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Login rejected by service: {message}")]
    LoginFailed { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Service-Reported Errors
    // ============================================================================
    #[error("Service rejected request payload: {message}")]
    InvalidPayload { message: String },

    #[error("Service error {code}: {message}")]
    Remote { code: i64, message: String },

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a login-failed error (service error code 15)
    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::LoginFailed {
            message: message.into(),
        }
    }

    /// Create an invalid-payload error (service error code 71)
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create a remote service error
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True if the service reported this error (as opposed to a transport
    /// or local failure)
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Error::LoginFailed { .. } | Error::InvalidPayload { .. } | Error::Remote { .. }
        )
    }
}

/// Result type alias for recordkit
pub type Result<T> = std::result::Result<T, Error>;
