//! Workflow controllers, one per research type.
//!
//! Every controller walks the same skeleton: create the query row, mark it
//! running, submit provider tasks through the orchestrator, wait, derive
//! analytics, persist datasets (and optionally an insight), then finalize.
//! Any error at any stage is caught at the top of [`run_query`] and turned
//! into a failed query with the message captured — datasets written by
//! earlier stages stay queryable.

pub mod competitor_research;
pub mod keyword_discovery;
pub mod serp_analysis;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rankscout_core::QueryType;
use rankscout_provider::adapters::TaskKind;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::orchestrator::TaskOrchestrator;
use crate::summarize::{self, SummarizationQueue, SummaryOutput};

/// Everything a workflow needs, constructed once and passed explicitly —
/// there are no module-scope singletons. Wait budgets and poll cadence are
/// workflow-specific constants, not shared configuration.
#[derive(Clone)]
pub struct WorkflowContext {
    pub pool: PgPool,
    pub orchestrator: Arc<TaskOrchestrator>,
    pub summarizer: SummarizationQueue,
}

/// Budget for the summarization stage, shared by all workflows.
const SUMMARY_WAIT_TIMEOUT: Duration = Duration::from_secs(180);
const SUMMARY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Runs one research query end to end and returns its final row.
///
/// The returned row is `completed` on success or `failed` with
/// `error_message` set; this function only errors when the store itself is
/// unreachable.
///
/// # Errors
///
/// Returns [`EngineError::Db`] if the query row cannot be created, started,
/// or read back.
pub async fn run_query(
    ctx: &WorkflowContext,
    query_type: QueryType,
    params: serde_json::Value,
) -> Result<rankscout_db::ResearchQueryRow, EngineError> {
    let query = rankscout_db::create_research_query(&ctx.pool, query_type.as_str(), &params).await?;
    rankscout_db::start_research_query(&ctx.pool, query.id).await?;
    tracing::info!(query_id = %query.id, query_type = %query_type, "research query started");

    let outcome = match query_type {
        QueryType::KeywordDiscovery => keyword_discovery::run(ctx, query.id, &params).await,
        QueryType::SerpAnalysis => serp_analysis::run(ctx, query.id, &params).await,
        QueryType::CompetitorResearch => competitor_research::run(ctx, query.id, &params).await,
    };

    match outcome {
        Ok(()) => {
            if let Err(e) = rankscout_db::complete_research_query(&ctx.pool, query.id).await {
                fail_query_best_effort(&ctx.pool, query.id, &e.to_string()).await;
                return Err(e.into());
            }
            tracing::info!(query_id = %query.id, "research query completed");
        }
        Err(e) => {
            tracing::error!(query_id = %query.id, error = %e, "research query failed");
            fail_query_best_effort(&ctx.pool, query.id, &e.to_string()).await;
        }
    }

    rankscout_db::get_research_query(&ctx.pool, query.id)
        .await
        .map_err(EngineError::from)
}

/// Record a query failure, logging rather than propagating store errors —
/// the original failure is the one the caller needs to see.
async fn fail_query_best_effort(pool: &PgPool, id: Uuid, message: &str) {
    if let Err(e) = rankscout_db::fail_research_query(pool, id, message).await {
        tracing::error!(query_id = %id, error = %e, "could not record query failure");
    }
}

/// Best-effort progress checkpoint.
pub(crate) async fn checkpoint(ctx: &WorkflowContext, query_id: Uuid, progress: i32) {
    if let Err(e) = rankscout_db::set_query_progress(&ctx.pool, query_id, progress).await {
        tracing::warn!(query_id = %query_id, progress, error = %e, "could not persist progress");
    }
}

/// Parse a workflow's typed parameters out of the stored JSON payload.
pub(crate) fn parse_params<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, EngineError> {
    serde_json::from_value(value.clone())
        .map_err(|e| EngineError::Validation(format!("invalid parameters: {e}")))
}

/// Submit one task and write its row through to the store, provider id
/// included.
pub(crate) async fn submit_and_record(
    ctx: &WorkflowContext,
    query_id: Uuid,
    kind: TaskKind,
    payload: serde_json::Value,
) -> Result<Uuid, EngineError> {
    let task_id = ctx.orchestrator.submit(kind, payload.clone()).await?;
    let info = ctx
        .orchestrator
        .info(task_id)
        .ok_or(EngineError::UnknownJob(task_id))?;
    rankscout_db::create_research_task(
        &ctx.pool,
        task_id,
        query_id,
        kind.as_str(),
        &payload,
        &info.provider_task_id,
    )
    .await?;
    Ok(task_id)
}

/// Wait for a stage's tasks and mirror their terminal states to the store.
///
/// On success every task row gets its result snapshot; on failure the rows
/// still open are marked failed with the stage error, and the original
/// error propagates.
pub(crate) async fn await_tasks(
    ctx: &WorkflowContext,
    ids: &[Uuid],
    timeout: Duration,
    poll_interval: Duration,
) -> Result<HashMap<Uuid, serde_json::Value>, EngineError> {
    match ctx
        .orchestrator
        .wait_for_all(ids, timeout, poll_interval)
        .await
    {
        Ok(results) => {
            for (id, result) in &results {
                if let Err(e) = rankscout_db::complete_research_task(&ctx.pool, *id, result).await {
                    tracing::warn!(task_id = %id, error = %e, "could not persist task result");
                }
            }
            Ok(results)
        }
        Err(e) => {
            let message = e.to_string();
            for &id in ids {
                // Terminal rows reject this update; first outcome wins.
                if let Err(db_err) = rankscout_db::fail_research_task(&ctx.pool, id, &message).await
                {
                    tracing::debug!(task_id = %id, error = %db_err, "task row not updated after stage failure");
                }
            }
            Err(e)
        }
    }
}

/// Flatten a task result into its item objects.
///
/// Provider results arrive as an array of result objects, each usually
/// wrapping an `items` array; results without `items` are taken as the
/// items themselves.
pub(crate) fn collect_items(result: &serde_json::Value) -> Vec<serde_json::Value> {
    let Some(entries) = result.as_array() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for entry in entries {
        match entry.get("items").and_then(serde_json::Value::as_array) {
            Some(nested) => items.extend(nested.iter().cloned()),
            None => items.push(entry.clone()),
        }
    }
    items
}

/// Deserialize every item in a task result, skipping malformed entries
/// with a warning.
pub(crate) fn parse_items<T: DeserializeOwned>(result: &serde_json::Value) -> Vec<T> {
    collect_items(result)
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value::<T>(item)
                .map_err(|e| {
                    tracing::warn!(error = %e, "skipping malformed result item");
                })
                .ok()
        })
        .collect()
}

/// Render the workflow's template, run the summarization job, and persist
/// the insight.
pub(crate) async fn summarize_and_persist(
    ctx: &WorkflowContext,
    query_id: Uuid,
    template_id: &str,
    vars: &HashMap<String, String>,
) -> Result<(), EngineError> {
    let template = summarize::template(template_id)
        .ok_or_else(|| EngineError::Validation(format!("unknown template '{template_id}'")))?;
    let prompt = summarize::render(template, vars)?;

    let job_id = ctx.summarizer.enqueue(query_id, template.system, &prompt);
    let mut outputs = ctx
        .summarizer
        .wait_for_all(&[job_id], SUMMARY_WAIT_TIMEOUT, SUMMARY_POLL_INTERVAL)
        .await?;
    let output = outputs
        .remove(&job_id)
        .ok_or(EngineError::UnknownJob(job_id))?;

    let insight = insight_from_output(query_id, &output)?;
    rankscout_db::insert_insight(&ctx.pool, &insight).await?;
    Ok(())
}

fn insight_from_output(
    query_id: Uuid,
    output: &SummaryOutput,
) -> Result<rankscout_db::NewInsight, EngineError> {
    Ok(rankscout_db::NewInsight {
        query_id,
        summary: output.summary.clone(),
        insights: serde_json::to_value(&output.insights)
            .map_err(|e| EngineError::Summarization(e.to_string()))?,
        recommendations: serde_json::to_value(&output.recommendations)
            .map_err(|e| EngineError::Summarization(e.to_string()))?,
        key_metrics: output.key_metrics.clone(),
        next_steps: output
            .next_steps
            .as_ref()
            .map(|steps| {
                serde_json::to_value(steps).map_err(|e| EngineError::Summarization(e.to_string()))
            })
            .transpose()?,
    })
}
