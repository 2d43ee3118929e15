//! Database operations for `research_queries`.
//!
//! A query's status walks `pending → in_progress → completed | failed`;
//! every transition is guarded by a `WHERE status = ...` clause so a row can
//! never resurrect out of a terminal state.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `research_queries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResearchQueryRow {
    pub id: Uuid,
    pub query_type: String,
    pub parameters: serde_json::Value,
    pub status: String,
    pub progress: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Creates a new research query in `pending` status at progress 0.
///
/// The id is generated in Rust so callers can reference the query before
/// the insert round-trips.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_research_query(
    pool: &PgPool,
    query_type: &str,
    parameters: &serde_json::Value,
) -> Result<ResearchQueryRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, ResearchQueryRow>(
        "INSERT INTO research_queries (id, query_type, parameters, status, progress) \
         VALUES ($1, $2, $3, 'pending', 0) \
         RETURNING id, query_type, parameters, status, progress, error_message, \
                   created_at, completed_at",
    )
    .bind(id)
    .bind(query_type)
    .bind(parameters)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a query as `in_progress`.
///
/// # Errors
///
/// Returns [`DbError::InvalidQueryTransition`] if the query is not
/// `pending`, or [`DbError::Sqlx`] if the update fails.
pub async fn start_research_query(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE research_queries \
         SET status = 'in_progress' \
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidQueryTransition {
            id,
            expected_status: "pending",
        });
    }

    Ok(())
}

/// Records a progress checkpoint (0–100) for a running query.
///
/// Progress on a terminal query is silently ignored — the workflow may
/// still be unwinding when a failure has already been recorded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_query_progress(pool: &PgPool, id: Uuid, progress: i32) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE research_queries \
         SET progress = $1 \
         WHERE id = $2 AND status = 'in_progress'",
    )
    .bind(progress.clamp(0, 100))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Marks a query as `completed` at progress 100 and stamps `completed_at`.
///
/// # Errors
///
/// Returns [`DbError::InvalidQueryTransition`] if the query is not
/// `in_progress`, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_research_query(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE research_queries \
         SET status = 'completed', progress = 100, completed_at = NOW() \
         WHERE id = $1 AND status = 'in_progress'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidQueryTransition {
            id,
            expected_status: "in_progress",
        });
    }

    Ok(())
}

/// Marks a query as `failed`, capturing the error message and stamping
/// `completed_at`. Accepted from `pending` or `in_progress`.
///
/// # Errors
///
/// Returns [`DbError::InvalidQueryTransition`] if the query is already
/// terminal, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_research_query(
    pool: &PgPool,
    id: Uuid,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE research_queries \
         SET status = 'failed', error_message = $1, completed_at = NOW() \
         WHERE id = $2 AND status IN ('pending', 'in_progress')",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidQueryTransition {
            id,
            expected_status: "pending or in_progress",
        });
    }

    Ok(())
}

/// Fetches a single query by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_research_query(pool: &PgPool, id: Uuid) -> Result<ResearchQueryRow, DbError> {
    let row = sqlx::query_as::<_, ResearchQueryRow>(
        "SELECT id, query_type, parameters, status, progress, error_message, \
                created_at, completed_at \
         FROM research_queries \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` queries, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_queries(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ResearchQueryRow>, DbError> {
    let rows = sqlx::query_as::<_, ResearchQueryRow>(
        "SELECT id, query_type, parameters, status, progress, error_message, \
                created_at, completed_at \
         FROM research_queries \
         ORDER BY created_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
