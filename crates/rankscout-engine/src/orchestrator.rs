//! Provider task orchestration: submit, poll, wait, sweep, evict.
//!
//! Owns the registry of in-flight provider tasks. Every submission passes
//! the rate limiter first and records its [`TaskKind`], so result lookup
//! dispatches straight to the matching endpoint instead of probing each
//! endpoint in turn.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use rankscout_core::QueryStatus;
use rankscout_provider::adapters::TaskKind;
use rankscout_provider::{ProviderClient, RateLimiter};
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::Ledger;

/// How many pending tasks the background sweep polls concurrently.
const SWEEP_CONCURRENCY: usize = 4;

/// Immutable facts recorded at submission time.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub provider_task_id: String,
    pub kind: TaskKind,
    /// Submission cost reported by the provider.
    pub cost: f64,
}

/// Registry + poll/wait engine for outstanding provider tasks.
pub struct TaskOrchestrator {
    client: ProviderClient,
    limiter: RateLimiter,
    ledger: Ledger<TaskInfo, serde_json::Value>,
}

impl TaskOrchestrator {
    #[must_use]
    pub fn new(client: ProviderClient, limiter: RateLimiter) -> Self {
        Self {
            client,
            limiter,
            ledger: Ledger::new(),
        }
    }

    /// Submits one task payload to the endpoint matching `kind`.
    ///
    /// The rate limiter is consulted first: a denied submission fails fast
    /// with [`EngineError::RateLimited`] and creates no task anywhere.
    ///
    /// # Errors
    ///
    /// - [`EngineError::RateLimited`] if the limiter denies the call.
    /// - [`EngineError::Provider`] on transport failure, an envelope-level
    ///   error, or a rejected payload.
    /// - [`EngineError::Protocol`] if the response carries no task entry.
    pub async fn submit(
        &self,
        kind: TaskKind,
        payload: serde_json::Value,
    ) -> Result<Uuid, EngineError> {
        if !self.limiter.try_acquire() {
            tracing::warn!(kind = %kind, "submission denied by rate limiter");
            return Err(EngineError::RateLimited);
        }

        let envelope = self
            .client
            .post_tasks(kind.endpoint(), std::slice::from_ref(&payload))
            .await?;

        let task = envelope.tasks.into_iter().next().ok_or_else(|| {
            EngineError::Protocol(format!("task_post on {kind} returned no task entry"))
        })?;

        if self.client.codes().is_error(&task) {
            // The provider rejected the payload outright; nothing to register.
            return Err(EngineError::Provider(
                rankscout_provider::ProviderError::Api {
                    code: task.status_code,
                    message: task.status_message,
                },
            ));
        }

        let id = self.ledger.insert(TaskInfo {
            provider_task_id: task.id.clone(),
            kind,
            cost: task.cost,
        });
        tracing::debug!(task_id = %id, provider_task_id = %task.id, kind = %kind, "task submitted");
        Ok(id)
    }

    /// Current lifecycle state of a task, or `None` for an unknown id.
    #[must_use]
    pub fn status(&self, id: Uuid) -> Option<QueryStatus> {
        self.ledger.state(id)
    }

    /// Submission-time facts for a task, or `None` for an unknown id.
    #[must_use]
    pub fn info(&self, id: Uuid) -> Option<TaskInfo> {
        self.ledger.payload(id)
    }

    /// Fetches a task's result.
    ///
    /// Returns `Ok(Some(result))` once the task is complete — from cache if
    /// it already completed, without touching the provider again — and
    /// `Ok(None)` while the provider is still working. The kind recorded at
    /// submission picks the single `task_get` endpoint to query.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownJob`] for an unregistered or evicted id.
    /// - [`EngineError::TaskFailed`] if the task reached an error status.
    /// - [`EngineError::Provider`] on transport failure while polling.
    pub async fn result(&self, id: Uuid) -> Result<Option<serde_json::Value>, EngineError> {
        let entry = self.ledger.get(id).ok_or(EngineError::UnknownJob(id))?;

        match entry.state {
            QueryStatus::Completed => {
                return Ok(Some(entry.result.unwrap_or(serde_json::Value::Null)));
            }
            QueryStatus::Failed => {
                return Err(EngineError::TaskFailed {
                    id,
                    message: entry.error.unwrap_or_default(),
                });
            }
            QueryStatus::Pending | QueryStatus::InProgress => {}
        }

        let envelope = self
            .client
            .get_task(entry.payload.kind.endpoint(), &entry.payload.provider_task_id)
            .await?;
        let task = envelope.tasks.into_iter().next().ok_or_else(|| {
            EngineError::Protocol(format!(
                "task_get for {} returned no task entry",
                entry.payload.provider_task_id
            ))
        })?;

        let codes = self.client.codes();
        if codes.is_complete(&task) {
            let result = serde_json::Value::Array(task.result.unwrap_or_default());
            self.ledger.complete(id, result.clone());
            tracing::debug!(task_id = %id, "task completed");
            Ok(Some(result))
        } else if codes.is_error(&task) {
            let message = format!("{} ({})", task.status_message, task.status_code);
            self.ledger.fail(id, message.clone());
            tracing::warn!(task_id = %id, error = %message, "task failed at provider");
            Err(EngineError::TaskFailed { id, message })
        } else {
            self.ledger.mark_in_progress(id);
            Ok(None)
        }
    }

    /// Polls until every id has a result, or the deadline passes.
    ///
    /// Each tick fetches every not-yet-resolved id, then sleeps
    /// `poll_interval`. Results are aggregated by id, never by arrival
    /// order. The returned map always contains every requested id — on
    /// timeout or task failure this raises instead of returning partially.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Timeout`] if `timeout` elapses with unresolved ids.
    /// - Any error from [`TaskOrchestrator::result`], which fails the wait
    ///   immediately.
    pub async fn wait_for_all(
        &self,
        ids: &[Uuid],
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<HashMap<Uuid, serde_json::Value>, EngineError> {
        let deadline = Instant::now() + timeout;
        let mut resolved: HashMap<Uuid, serde_json::Value> = HashMap::new();

        loop {
            for &id in ids {
                if resolved.contains_key(&id) {
                    continue;
                }
                if let Some(result) = self.result(id).await? {
                    resolved.insert(id, result);
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

    /// Advances non-terminal tasks the provider reports as ready.
    ///
    /// Run by the background scheduler so task state stays fresh for status
    /// polls even when no `wait_for_all` caller is active. One `tasks_ready`
    /// call per endpoint with open tasks discovers what finished; only those
    /// tasks are then fetched. Failures are recorded on their task and do
    /// not stop the sweep. Returns the number of tasks that reached a
    /// terminal state.
    pub async fn sweep(&self) -> usize {
        let open = self.ledger.unresolved_entries();
        if open.is_empty() {
            return 0;
        }

        let mut by_endpoint: HashMap<&'static str, Vec<(Uuid, String)>> = HashMap::new();
        for (id, info) in open {
            by_endpoint
                .entry(info.kind.endpoint())
                .or_default()
                .push((id, info.provider_task_id));
        }

        let mut advanced = 0;
        for (endpoint, tasks) in by_endpoint {
            let ready: HashSet<String> = match self.client.tasks_ready(endpoint).await {
                Ok(envelope) => envelope.tasks.into_iter().map(|t| t.id).collect(),
                Err(e) => {
                    tracing::warn!(endpoint, error = %e, "sweep: tasks_ready poll failed");
                    continue;
                }
            };

            let due: Vec<Uuid> = tasks
                .into_iter()
                .filter(|(_, provider_id)| ready.contains(provider_id))
                .map(|(id, _)| id)
                .collect();

            let outcomes: Vec<bool> = stream::iter(due)
                .map(|id| async move {
                    match self.result(id).await {
                        Ok(Some(_)) => true,
                        Ok(None) => false,
                        Err(e) => {
                            tracing::debug!(task_id = %id, error = %e, "sweep fetch failed");
                            matches!(e, EngineError::TaskFailed { .. })
                        }
                    }
                })
                .buffer_unordered(SWEEP_CONCURRENCY)
                .collect()
                .await;
            advanced += outcomes.into_iter().filter(|done| *done).count();
        }

        advanced
    }

    /// Removes completed/failed tasks older than the retention window.
    /// Returns the number evicted.
    pub fn evict_completed(&self, older_than: Duration) -> usize {
        let evicted = self.ledger.evict_terminal_older_than(older_than);
        if evicted > 0 {
            tracing::info!(evicted, "evicted terminal tasks from registry");
        }
        evicted
    }

    /// Number of tasks currently registered, terminal or not.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.ledger.len()
    }
}
