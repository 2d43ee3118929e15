//! Summarization job queue.
//!
//! The same ledger lifecycle as provider tasks, fronting a single-call
//! backend: `enqueue` registers the job and spawns the dispatch, so the
//! caller polls or waits exactly the way it does for provider work.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rankscout_core::QueryStatus;
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::Ledger;
use crate::summarize::client::{SummarizerClient, SummaryOutput};

/// Submission-time facts for one summarization job.
#[derive(Debug, Clone)]
pub struct SummaryJobInfo {
    pub owner_id: Uuid,
    pub system: String,
    pub input: String,
}

/// Queue of summarization jobs backed by the shared ledger.
///
/// Cheap to clone; all clones share one registry and one backend client.
#[derive(Clone)]
pub struct SummarizationQueue {
    client: Arc<SummarizerClient>,
    ledger: Arc<Ledger<SummaryJobInfo, SummaryOutput>>,
}

impl SummarizationQueue {
    #[must_use]
    pub fn new(client: SummarizerClient) -> Self {
        Self {
            client: Arc::new(client),
            ledger: Arc::new(Ledger::new()),
        }
    }

    /// Registers a job and spawns its dispatch. Returns immediately with
    /// the job id; the job moves to `in_progress` when the backend call
    /// starts and to `completed`/`failed` when it returns.
    pub fn enqueue(&self, owner_id: Uuid, system: &str, input: &str) -> Uuid {
        let id = self.ledger.insert(SummaryJobInfo {
            owner_id,
            system: system.to_owned(),
            input: input.to_owned(),
        });

        let client = Arc::clone(&self.client);
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            let Some(info) = ledger.payload(id) else {
                return;
            };
            ledger.mark_in_progress(id);
            match client.summarize(&info.system, &info.input).await {
                Ok(output) => {
                    tracing::debug!(job_id = %id, owner_id = %info.owner_id, "summarization job completed");
                    ledger.complete(id, output);
                }
                Err(e) => {
                    tracing::warn!(job_id = %id, owner_id = %info.owner_id, error = %e, "summarization job failed");
                    ledger.fail(id, e.to_string());
                }
            }
        });

        id
    }

    /// Current lifecycle state of a job, or `None` for an unknown id.
    #[must_use]
    pub fn status(&self, id: Uuid) -> Option<QueryStatus> {
        self.ledger.state(id)
    }

    /// The job's output once complete, `Ok(None)` while it is still running.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownJob`] for an unregistered or evicted id.
    /// - [`EngineError::JobFailed`] if the job reached the failed state.
    pub fn result(&self, id: Uuid) -> Result<Option<SummaryOutput>, EngineError> {
        let entry = self.ledger.get(id).ok_or(EngineError::UnknownJob(id))?;
        match entry.state {
            QueryStatus::Completed => Ok(entry.result),
            QueryStatus::Failed => Err(EngineError::JobFailed {
                id,
                message: entry.error.unwrap_or_default(),
            }),
            QueryStatus::Pending | QueryStatus::InProgress => Ok(None),
        }
    }

    /// Polls until every job has an output, or the deadline passes.
    ///
    /// Identical contract to the task orchestrator's `wait_for_all`: the
    /// returned map contains every requested id, or the call raises.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Timeout`] if `timeout` elapses with unresolved ids.
    /// - Any error from [`SummarizationQueue::result`], which fails the
    ///   wait immediately.
    pub async fn wait_for_all(
        &self,
        ids: &[Uuid],
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<HashMap<Uuid, SummaryOutput>, EngineError> {
        let deadline = Instant::now() + timeout;
        let mut resolved: HashMap<Uuid, SummaryOutput> = HashMap::new();

        loop {
            for &id in ids {
                if resolved.contains_key(&id) {
                    continue;
                }
                if let Some(output) = self.result(id)? {
                    resolved.insert(id, output);
                }
            }

            let pending = ids.iter().filter(|id| !resolved.contains_key(id)).count();
            if pending == 0 {
                return Ok(resolved);
            }
            if Instant::now() >= deadline {
                return Err(EngineError::Timeout {
                    timeout_secs: timeout.as_secs(),
                    pending,
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Removes completed/failed jobs older than the retention window.
    /// Returns the number evicted.
    pub fn evict_completed(&self, older_than: Duration) -> usize {
        let evicted = self.ledger.evict_terminal_older_than(older_than);
        if evicted > 0 {
            tracing::info!(evicted, "evicted terminal summarization jobs");
        }
        evicted
    }
}
