//! Auth configuration types

/// Credentials used to obtain a token.
///
/// Supplied once at construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Client id used to login
    pub client_id: String,
    /// Client secret used to login
    pub client_secret: String,
    /// Username (email) used to login
    pub username: String,
    /// Password used to login
    pub password: String,
}

impl Credentials {
    /// Create a new set of credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Login strategy used when the token cache is empty
#[derive(Debug, Clone)]
pub enum AuthFlow {
    /// OAuth2 password grant against a dedicated token endpoint.
    ///
    /// The token arrives in the `access_token` field of the response.
    OauthPassword {
        /// Token endpoint URL
        token_url: String,
        /// Login credentials
        credentials: Credentials,
    },

    /// Form login against the service's own unauthenticated login
    /// endpoint. The token arrives in the `api_key` field; a service
    /// error is reported via the `err` field of the same body.
    LoginForm {
        /// Login endpoint URL
        login_url: String,
        /// Account-level key sent alongside username/password
        user_key: String,
        /// Login credentials (only username/password are sent)
        credentials: Credentials,
    },
}

/// Format of the auth header attached to every authenticated request.
///
/// The header value is templated as `<scheme> <token>[, <secondary>]`.
/// The exact shape is a deployment constant, not a protocol invariant,
/// so all parts are configuration. Deployments that carry additional
/// fixed credentials (e.g. a business-unit id) in separate headers list
/// them in `extra_headers`.
#[derive(Debug, Clone)]
pub struct AuthHeaderFormat {
    /// Header name, usually "Authorization"
    pub header_name: String,
    /// Scheme prefix, e.g. "Bearer"
    pub scheme: String,
    /// Optional secondary credential appended after the token
    pub secondary: Option<String>,
    /// Additional fixed headers sent with every authenticated request
    pub extra_headers: Vec<(String, String)>,
}

impl Default for AuthHeaderFormat {
    fn default() -> Self {
        Self {
            header_name: "Authorization".to_string(),
            scheme: "Bearer".to_string(),
            secondary: None,
            extra_headers: Vec::new(),
        }
    }
}

impl AuthHeaderFormat {
    /// Bearer-scheme format with no secondary credential
    pub fn bearer() -> Self {
        Self::default()
    }

    /// Set the scheme prefix
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Append a secondary credential after the token
    #[must_use]
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    /// Add a fixed extra header
    #[must_use]
    pub fn with_extra_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Render the header value for a token
    pub fn render(&self, token: &str) -> String {
        match &self.secondary {
            Some(secondary) => format!("{} {}, {}", self.scheme, token, secondary),
            None => format!("{} {}", self.scheme, token),
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_render_bearer() {
        let format = AuthHeaderFormat::bearer();
        assert_eq!(format.render("tok123"), "Bearer tok123");
    }

    #[test]
    fn test_render_with_secondary() {
        let format = AuthHeaderFormat::default()
            .with_scheme("Pardot")
            .with_secondary("user_key=abc");
        assert_eq!(format.render("tok123"), "Pardot tok123, user_key=abc");
    }
}
