//! Concurrent pagination module
//!
//! Fetches an unbounded, unordered collection of records by fanning out
//! page requests across a fixed number of workers.
//!
//! # Overview
//!
//! A `PageSource` retrieves one page and classifies it as records or
//! end-of-data. The `QueryRunner` drives W concurrent workers over a
//! shared monotonic offset counter, pushes each page's raw payload into a
//! caller-supplied sink, and drains the whole job on the first EOF or
//! first error any worker reports. Pages arrive in no particular order.

mod page;
mod runner;
mod types;

pub use page::QueryPages;
pub use runner::QueryRunner;
pub use types::{PageOutcome, PageRequest, PageSource, QueryConfig};
