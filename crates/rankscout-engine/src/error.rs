use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the orchestration engine.
///
/// Workflow controllers catch every variant at the top level and convert it
/// into a failed query with the message captured; nothing here is retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad input, rejected before any provider work is submitted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The outbound rate limiter denied the submission. No task was created;
    /// the caller decides whether to try again later.
    #[error("provider rate limit reached, submission denied")]
    RateLimited,

    /// Transport or API failure talking to the provider.
    #[error(transparent)]
    Provider(#[from] rankscout_provider::ProviderError),

    /// The provider accepted the call but the response violated the task
    /// protocol (e.g. an empty `tasks` array on submission).
    #[error("provider protocol violation: {0}")]
    Protocol(String),

    /// A provider task reached an error status code.
    #[error("task {id} failed: {message}")]
    TaskFailed { id: Uuid, message: String },

    /// A `wait_for_all` deadline elapsed with jobs still unresolved.
    #[error("timed out after {timeout_secs}s with {pending} job(s) unresolved")]
    Timeout { timeout_secs: u64, pending: usize },

    /// The id was never registered, or was already evicted.
    #[error("unknown job id: {0}")]
    UnknownJob(Uuid),

    /// The summarization backend failed or returned a malformed document.
    #[error("summarization failed: {0}")]
    Summarization(String),

    /// A summarization job reached the failed state.
    #[error("summarization job {id} failed: {message}")]
    JobFailed { id: Uuid, message: String },

    #[error(transparent)]
    Db(#[from] rankscout_db::DbError),
}
