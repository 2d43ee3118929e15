//! Generic in-memory job ledger.
//!
//! The task orchestrator and the summarization queue share the same
//! lifecycle shape — register a job, advance it through
//! `pending → in_progress → completed | failed`, read results back by id,
//! evict old terminal entries. This ledger implements that shape once,
//! parameterized over the job's payload and result types.
//!
//! State lives only in this process and is lost on restart. The mutex is
//! held for map operations only, never across an await point.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rankscout_core::QueryStatus;
use uuid::Uuid;

/// One registered job.
#[derive(Debug, Clone)]
pub struct JobEntry<P, R> {
    pub payload: P,
    pub state: QueryStatus,
    pub result: Option<R>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Registry of jobs keyed by internal id.
pub struct Ledger<P, R> {
    entries: Mutex<HashMap<Uuid, JobEntry<P, R>>>,
}

impl<P: Clone, R: Clone> Ledger<P, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new pending job and returns its internal id.
    pub fn insert(&self, payload: P) -> Uuid {
        let id = Uuid::new_v4();
        let entry = JobEntry {
            payload,
            state: QueryStatus::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.lock().insert(id, entry);
        id
    }

    #[must_use]
    pub fn state(&self, id: Uuid) -> Option<QueryStatus> {
        self.lock().get(&id).map(|e| e.state)
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<JobEntry<P, R>> {
        self.lock().get(&id).cloned()
    }

    #[must_use]
    pub fn payload(&self, id: Uuid) -> Option<P> {
        self.lock().get(&id).map(|e| e.payload.clone())
    }

    /// Moves a pending job to `in_progress`. Terminal entries are untouched.
    pub fn mark_in_progress(&self, id: Uuid) {
        if let Some(entry) = self.lock().get_mut(&id) {
            if entry.state == QueryStatus::Pending {
                entry.state = QueryStatus::InProgress;
            }
        }
    }

    /// Completes a job and caches its result. A job already terminal keeps
    /// its first outcome; completion never overwrites it.
    pub fn complete(&self, id: Uuid, result: R) {
        if let Some(entry) = self.lock().get_mut(&id) {
            if entry.state.is_terminal() {
                return;
            }
            entry.state = QueryStatus::Completed;
            entry.result = Some(result);
            entry.completed_at = Some(Utc::now());
        }
    }

    /// Fails a job with a captured message. First terminal outcome wins.
    pub fn fail(&self, id: Uuid, error: String) {
        if let Some(entry) = self.lock().get_mut(&id) {
            if entry.state.is_terminal() {
                return;
            }
            entry.state = QueryStatus::Failed;
            entry.error = Some(error);
            entry.completed_at = Some(Utc::now());
        }
    }

    /// Non-terminal entries with their payloads.
    #[must_use]
    pub fn unresolved_entries(&self) -> Vec<(Uuid, P)> {
        self.lock()
            .iter()
            .filter(|(_, e)| !e.state.is_terminal())
            .map(|(id, e)| (*id, e.payload.clone()))
            .collect()
    }

    /// Removes terminal entries that completed more than `older_than` ago.
    /// Returns the number evicted.
    ///
    /// # Panics
    ///
    /// Panics if `older_than` exceeds the range representable by
    /// `chrono::Duration` (about 292 million years).
    pub fn evict_terminal_older_than(&self, older_than: std::time::Duration) -> usize {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(older_than).expect("retention duration out of range");
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| {
            !(e.state.is_terminal() && e.completed_at.is_some_and(|done| done < cutoff))
        });
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, JobEntry<P, R>>> {
        self.entries.lock().expect("job ledger mutex poisoned")
    }
}

impl<P: Clone, R: Clone> Default for Ledger<P, R> {
    fn default() -> Self {
        Self::new()
    }
}
