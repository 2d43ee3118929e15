//! Database operations for `datasets`.
//!
//! A dataset is a named, immutable snapshot of processed results. Rows are
//! only ever inserted; there is deliberately no update operation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `datasets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatasetRow {
    pub id: Uuid,
    pub query_id: Uuid,
    /// The task this snapshot derives from, when it derives from exactly one.
    /// Combined-result datasets leave this null.
    pub task_id: Option<Uuid>,
    pub name: String,
    pub kind: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a dataset.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub query_id: Uuid,
    pub task_id: Option<Uuid>,
    pub name: String,
    pub kind: String,
    pub data: serde_json::Value,
}

/// Inserts one immutable dataset snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_dataset(pool: &PgPool, dataset: &NewDataset) -> Result<DatasetRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, DatasetRow>(
        "INSERT INTO datasets (id, query_id, task_id, name, kind, data) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, query_id, task_id, name, kind, data, created_at",
    )
    .bind(id)
    .bind(dataset.query_id)
    .bind(dataset.task_id)
    .bind(&dataset.name)
    .bind(&dataset.kind)
    .bind(&dataset.data)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns every dataset written for a query, oldest first.
///
/// Datasets from stages that completed before a later-stage failure remain
/// visible here even when the owning query is `failed`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_datasets_for_query(
    pool: &PgPool,
    query_id: Uuid,
) -> Result<Vec<DatasetRow>, DbError> {
    let rows = sqlx::query_as::<_, DatasetRow>(
        "SELECT id, query_id, task_id, name, kind, data, created_at \
         FROM datasets \
         WHERE query_id = $1 \
         ORDER BY created_at ASC",
    )
    .bind(query_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
