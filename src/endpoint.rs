//! Endpoint descriptors
//!
//! An endpoint describes one remote operation: HTTP method, path, and the
//! optional body/query capabilities. The base capabilities are required
//! trait methods; body and query default to "not present", so an endpoint
//! opts in by overriding them rather than by implementing extra marker
//! traits.
//!
//! Response decoding is deliberately not part of the descriptor: the
//! executor returns raw bytes and callers (or `Client::call_json`) decode
//! them, so one endpoint can feed both typed and streaming consumers.

use crate::error::Result;
use bytes::Bytes;
use reqwest::Method;

/// One remote operation, immutable once constructed
pub trait Endpoint: Send + Sync {
    /// HTTP method
    fn method(&self) -> Method;

    /// Path relative to the client's base URL
    fn path(&self) -> String;

    /// Request body, if this endpoint carries one
    fn body(&self) -> Result<Option<Bytes>> {
        Ok(None)
    }

    /// Query parameters, if this endpoint carries any.
    ///
    /// Ordered; the executor appends `format=json` after these.
    fn query(&self) -> Result<Vec<(String, String)>> {
        Ok(Vec::new())
    }
}

/// Ad hoc endpoint descriptor for one-off operations
#[derive(Debug, Clone)]
pub struct RawEndpoint {
    method: Method,
    path: String,
    body: Option<Bytes>,
    query: Vec<(String, String)>,
}

impl RawEndpoint {
    /// Create a descriptor with the given method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// GET descriptor
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST descriptor
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a request body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl Endpoint for RawEndpoint {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn body(&self) -> Result<Option<Bytes>> {
        Ok(self.body.clone())
    }

    fn query(&self) -> Result<Vec<(String, String)>> {
        Ok(self.query.clone())
    }
}
