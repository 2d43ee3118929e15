//! Background job scheduler.
//!
//! Registers two recurring jobs at startup: a 30-second sweep that advances
//! pending provider tasks even when no workflow is actively waiting, and an
//! hourly eviction pass that bounds registry memory by dropping terminal
//! entries past the retention window.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::orchestrator::TaskOrchestrator;
use crate::summarize::SummarizationQueue;

/// Builds and starts the background scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down both jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    orchestrator: Arc<TaskOrchestrator>,
    summarizer: SummarizationQueue,
    retention: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_sweep_job(&scheduler, Arc::clone(&orchestrator)).await?;
    register_eviction_job(&scheduler, orchestrator, summarizer, retention).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Poll every non-terminal provider task once, every 30 seconds.
async fn register_sweep_job(
    scheduler: &JobScheduler,
    orchestrator: Arc<TaskOrchestrator>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("*/30 * * * * *", move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);

        Box::pin(async move {
            let advanced = orchestrator.sweep().await;
            if advanced > 0 {
                tracing::info!(advanced, "scheduler: sweep advanced tasks to terminal state");
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Evict terminal tasks and summarization jobs past retention, hourly.
async fn register_eviction_job(
    scheduler: &JobScheduler,
    orchestrator: Arc<TaskOrchestrator>,
    summarizer: SummarizationQueue,
    retention: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);
        let summarizer = summarizer.clone();

        Box::pin(async move {
            let tasks = orchestrator.evict_completed(retention);
            let jobs = summarizer.evict_completed(retention);
            tracing::info!(tasks, jobs, "scheduler: eviction pass complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
