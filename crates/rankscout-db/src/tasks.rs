//! Database operations for `research_tasks`.
//!
//! One row per unit of provider work. `provider_task_id` is written exactly
//! once at creation and never updated; tasks accumulate under their query
//! and are never deleted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `research_tasks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResearchTaskRow {
    pub id: Uuid,
    pub query_id: Uuid,
    pub kind: String,
    pub status: String,
    pub parameters: serde_json::Value,
    pub provider_task_id: String,
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Creates a task row in `pending` status with its immutable provider id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_research_task(
    pool: &PgPool,
    id: Uuid,
    query_id: Uuid,
    kind: &str,
    parameters: &serde_json::Value,
    provider_task_id: &str,
) -> Result<ResearchTaskRow, DbError> {
    let row = sqlx::query_as::<_, ResearchTaskRow>(
        "INSERT INTO research_tasks (id, query_id, kind, status, parameters, provider_task_id) \
         VALUES ($1, $2, $3, 'pending', $4, $5) \
         RETURNING id, query_id, kind, status, parameters, provider_task_id, result, \
                   created_at, completed_at",
    )
    .bind(id)
    .bind(query_id)
    .bind(kind)
    .bind(parameters)
    .bind(provider_task_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a task `completed` and stores its result snapshot.
///
/// # Errors
///
/// Returns [`DbError::InvalidTaskTransition`] if the task was already
/// terminal, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_research_task(
    pool: &PgPool,
    id: Uuid,
    result: &serde_json::Value,
) -> Result<(), DbError> {
    let updated = sqlx::query(
        "UPDATE research_tasks \
         SET status = 'completed', result = $1, completed_at = NOW() \
         WHERE id = $2 AND status IN ('pending', 'in_progress')",
    )
    .bind(result)
    .bind(id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(DbError::InvalidTaskTransition {
            id,
            expected_status: "pending or in_progress",
        });
    }

    Ok(())
}

/// Marks a task `failed` with the provider's status message.
///
/// # Errors
///
/// Returns [`DbError::InvalidTaskTransition`] if the task was already
/// terminal, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_research_task(pool: &PgPool, id: Uuid, error: &str) -> Result<(), DbError> {
    let updated = sqlx::query(
        "UPDATE research_tasks \
         SET status = 'failed', result = jsonb_build_object('error', $1::text), \
             completed_at = NOW() \
         WHERE id = $2 AND status IN ('pending', 'in_progress')",
    )
    .bind(error)
    .bind(id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(DbError::InvalidTaskTransition {
            id,
            expected_status: "pending or in_progress",
        });
    }

    Ok(())
}

/// Fetches one task by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_research_task(pool: &PgPool, id: Uuid) -> Result<ResearchTaskRow, DbError> {
    let row = sqlx::query_as::<_, ResearchTaskRow>(
        "SELECT id, query_id, kind, status, parameters, provider_task_id, result, \
                created_at, completed_at \
         FROM research_tasks \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns all tasks belonging to a query, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tasks_for_query(
    pool: &PgPool,
    query_id: Uuid,
) -> Result<Vec<ResearchTaskRow>, DbError> {
    let rows = sqlx::query_as::<_, ResearchTaskRow>(
        "SELECT id, query_id, kind, status, parameters, provider_task_id, result, \
                created_at, completed_at \
         FROM research_tasks \
         WHERE query_id = $1 \
         ORDER BY created_at ASC",
    )
    .bind(query_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
