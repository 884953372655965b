//! Concurrent query runner
//!
//! Fan-out fan-in over a shared offset counter: W workers each pull the
//! next page offset, fetch it, and push the payload into the sink. The
//! first worker to observe end-of-data or an error cancels the job
//! source; in-flight requests finish, nothing new is dispatched, and the
//! runner joins every worker before resolving the aggregate result.

use super::types::{PageOutcome, PageRequest, PageSource, QueryConfig};
use crate::error::{Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shared state of one query run; built fresh per `run` call
struct Job {
    /// Next page index to hand out; offsets are strictly increasing and
    /// never reused or skipped
    next_page: AtomicU64,
    /// First error observed across workers, write-once-wins
    first_error: Mutex<Option<Error>>,
    /// Drain signal; stops offset hand-out but never aborts in-flight
    /// requests
    cancel: CancellationToken,
}

impl Job {
    fn new(cancel: CancellationToken) -> Self {
        Self {
            next_page: AtomicU64::new(0),
            first_error: Mutex::new(None),
            cancel,
        }
    }

    async fn record_error(&self, err: Error) {
        let mut slot = self.first_error.lock().await;
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}

/// Drives concurrent page fetches over a [`PageSource`].
///
/// Holds only configuration; every `run` call builds fresh job state, so
/// a runner can be reused across queries.
#[derive(Debug, Clone)]
pub struct QueryRunner {
    config: QueryConfig,
}

impl QueryRunner {
    /// Create a runner with the given configuration
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Create a runner with the default worker count and page size
    pub fn with_defaults() -> Self {
        Self::new(QueryConfig::default())
    }

    /// Fetch every page and push each raw payload into `sink`.
    ///
    /// Sink invocations from different workers may be concurrent; the
    /// sink is responsible for its own synchronization. Pages arrive in
    /// no particular order. Returns `Ok(())` once every worker reached
    /// end-of-data, or the first error any worker observed.
    pub async fn run<F>(
        &self,
        source: Arc<dyn PageSource>,
        fields: Vec<String>,
        sink: F,
    ) -> Result<()>
    where
        F: Fn(Bytes) + Send + Sync + 'static,
    {
        self.run_with_cancel(source, fields, sink, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but additionally drains when the caller
    /// cancels `cancel`. Cancellation is cooperative: in-flight page
    /// requests still complete.
    pub async fn run_with_cancel<F>(
        &self,
        source: Arc<dyn PageSource>,
        fields: Vec<String>,
        sink: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: Fn(Bytes) + Send + Sync + 'static,
    {
        let sink: Arc<dyn Fn(Bytes) + Send + Sync> = Arc::new(sink);
        let job = Arc::new(Job::new(cancel.child_token()));

        let mut workers = JoinSet::new();
        for _ in 0..self.config.workers.max(1) {
            workers.spawn(worker(
                Arc::clone(&job),
                Arc::clone(&source),
                fields.clone(),
                self.config.page_size,
                Arc::clone(&sink),
            ));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                if err.is_panic() {
                    std::panic::resume_unwind(err.into_panic());
                }
            }
        }

        let result = match job.first_error.lock().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        };
        result
    }

    /// Fetch every page and decode the records into a single vector.
    ///
    /// Pull-mode counterpart of [`run`](Self::run) for callers that want
    /// a typed result instead of a streaming sink. No ordering guarantee;
    /// sort after collection if determinism matters.
    pub async fn collect<T>(&self, source: Arc<dyn PageSource>, fields: Vec<String>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let pages: Arc<std::sync::Mutex<Vec<Bytes>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
        {
            let pages = Arc::clone(&pages);
            self.run(source, fields, move |payload| {
                pages.lock().expect("page buffer poisoned").push(payload);
            })
            .await?;
        }

        let pages = std::mem::take(&mut *pages.lock().expect("page buffer poisoned"));
        let mut records = Vec::new();
        for page in pages {
            match serde_json::from_slice::<Vec<T>>(&page) {
                Ok(mut decoded) => records.append(&mut decoded),
                // Some deployments flatten a single-record page into a
                // bare object instead of a one-element array
                Err(_) => records.push(serde_json::from_slice::<T>(&page)?),
            }
        }
        Ok(records)
    }
}

impl Default for QueryRunner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One worker loop: take next offset, fetch, deliver, repeat until the
/// job drains or this worker hits a terminal condition.
async fn worker(
    job: Arc<Job>,
    source: Arc<dyn PageSource>,
    fields: Vec<String>,
    limit: u32,
    sink: Arc<dyn Fn(Bytes) + Send + Sync>,
) {
    loop {
        if job.cancel.is_cancelled() {
            return;
        }

        let page = job.next_page.fetch_add(1, Ordering::SeqCst);
        let offset = page * u64::from(limit);
        debug!(offset, limit, "fetching page");

        let request = PageRequest {
            offset,
            limit,
            fields: fields.clone(),
        };
        match source.fetch(request).await {
            Ok(PageOutcome::Records(payload)) => sink(payload),
            Ok(PageOutcome::End) => {
                debug!(offset, "end of data, draining job");
                job.cancel.cancel();
                return;
            }
            Err(err) => {
                warn!(offset, error = %err, "page fetch failed, draining job");
                job.record_error(err).await;
                job.cancel.cancel();
                return;
            }
        }
    }
}
