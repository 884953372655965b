//! Pagination types and traits

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// One page request; maps to exactly one HTTP call
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Record offset of the page start
    pub offset: u64,
    /// Page size
    pub limit: u32,
    /// Record fields to return
    pub fields: Vec<String>,
}

/// Classification of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A page of records, still encoded as the raw records payload
    Records(Bytes),
    /// The end-of-data page: the records field was absent from the body
    End,
}

impl PageOutcome {
    /// Check if this is the end-of-data outcome
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// Anything that can fetch one page of records.
///
/// The live implementation is [`QueryPages`](super::QueryPages); tests
/// substitute in-memory fakes.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page described by `request`
    async fn fetch(&self, request: PageRequest) -> Result<PageOutcome>;
}

/// Configuration for a concurrent query run.
///
/// The defaults match a service that allows five parallel requests: four
/// workers leave a safety margin, and pages of 200 records.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Number of concurrent workers; also the page-request ceiling
    pub workers: usize,
    /// Records per page; offsets advance in multiples of this
    pub page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            page_size: 200,
        }
    }
}

impl QueryConfig {
    /// Create a config with explicit worker count and page size
    pub fn new(workers: usize, page_size: u32) -> Self {
        Self { workers, page_size }
    }
}
