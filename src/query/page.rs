//! Page fetching against the live query endpoint

use super::types::{PageOutcome, PageRequest, PageSource};
use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::sync::Arc;

/// Endpoint descriptor for one page of a record query
struct QueryEndpoint {
    path: String,
    request: PageRequest,
}

impl Endpoint for QueryEndpoint {
    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn query(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("offset".to_string(), self.request.offset.to_string()),
            ("limit".to_string(), self.request.limit.to_string()),
            ("fields".to_string(), self.request.fields.join(",")),
        ])
    }
}

/// Page source backed by a query endpoint of the remote service.
///
/// `records_field` names the key under `result` that carries the page's
/// records (deployment-specific, e.g. `"prospect"`).
#[derive(Clone)]
pub struct QueryPages {
    client: Arc<Client>,
    path: String,
    records_field: String,
}

impl QueryPages {
    /// Create a page source for the query endpoint at `path`
    pub fn new(
        client: Arc<Client>,
        path: impl Into<String>,
        records_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            records_field: records_field.into(),
        }
    }
}

#[async_trait]
impl PageSource for QueryPages {
    async fn fetch(&self, request: PageRequest) -> Result<PageOutcome> {
        let endpoint = QueryEndpoint {
            path: self.path.clone(),
            request,
        };
        let bytes = self.client.execute(&endpoint).await?;
        decode_page(&bytes, &self.records_field)
    }
}

/// Classify a page body as records or end-of-data.
///
/// The service does not report totals reliably; the sole EOF signal is
/// the records field being absent from `result`. An explicit empty array
/// is a real (empty) page, not EOF.
pub(crate) fn decode_page(bytes: &Bytes, records_field: &str) -> Result<PageOutcome> {
    let body: serde_json::Value = serde_json::from_slice(bytes)?;

    match body.get("result").and_then(|result| result.get(records_field)) {
        None => Ok(PageOutcome::End),
        Some(records) => Ok(PageOutcome::Records(Bytes::from(serde_json::to_vec(
            records,
        )?))),
    }
}
