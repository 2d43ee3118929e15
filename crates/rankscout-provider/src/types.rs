//! Provider response envelope types.
//!
//! Every endpoint wraps its response in the same envelope: a top-level
//! status code/message plus a `tasks` array, where each task carries its own
//! status code and an optional `result` array. Status-code meaning is
//! configuration ([`ProviderCodes`]), not hardcoded business logic.

use serde::Deserialize;

/// The provider's status-code constants, treated as opaque configuration.
///
/// A task is complete when its status code equals `success`, an error when
/// its status code is at or above `error_threshold`, and still pending for
/// anything in between.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCodes {
    pub success: u32,
    pub error_threshold: u32,
}

impl Default for ProviderCodes {
    fn default() -> Self {
        Self {
            success: 20_000,
            error_threshold: 40_000,
        }
    }
}

impl ProviderCodes {
    #[must_use]
    pub fn is_complete(&self, task: &ProviderTask) -> bool {
        task.status_code == self.success
    }

    #[must_use]
    pub fn is_error(&self, task: &ProviderTask) -> bool {
        task.status_code >= self.error_threshold
    }

    /// Neither complete nor an error: the provider is still working.
    #[must_use]
    pub fn is_pending(&self, task: &ProviderTask) -> bool {
        !self.is_complete(task) && !self.is_error(task)
    }
}

/// Top-level envelope for all provider responses.
#[derive(Debug, Deserialize)]
pub struct TaskEnvelope {
    pub status_code: u32,
    pub status_message: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub tasks: Vec<ProviderTask>,
}

/// One task entry inside a [`TaskEnvelope`].
///
/// `result` is `None` until the provider finishes the task; completed tasks
/// carry an array of result objects whose shape depends on the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTask {
    pub id: String,
    pub status_code: u32,
    pub status_message: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub result: Option<Vec<serde_json::Value>>,
}
