//! Database operations for `insights` — the AI-generated summary attached
//! to a query. At most one per query; a re-request replaces the old row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `insights` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
    pub id: Uuid,
    pub query_id: Uuid,
    pub summary: String,
    pub insights: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub key_metrics: Option<serde_json::Value>,
    pub next_steps: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting an insight.
#[derive(Debug, Clone)]
pub struct NewInsight {
    pub query_id: Uuid,
    pub summary: String,
    pub insights: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub key_metrics: Option<serde_json::Value>,
    pub next_steps: Option<serde_json::Value>,
}

/// Inserts the insight for a query, replacing any existing one.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn insert_insight(pool: &PgPool, insight: &NewInsight) -> Result<InsightRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, InsightRow>(
        "INSERT INTO insights (id, query_id, summary, insights, recommendations, \
                               key_metrics, next_steps) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (query_id) DO UPDATE SET \
             summary         = EXCLUDED.summary, \
             insights        = EXCLUDED.insights, \
             recommendations = EXCLUDED.recommendations, \
             key_metrics     = EXCLUDED.key_metrics, \
             next_steps      = EXCLUDED.next_steps \
         RETURNING id, query_id, summary, insights, recommendations, \
                   key_metrics, next_steps, created_at",
    )
    .bind(id)
    .bind(insight.query_id)
    .bind(&insight.summary)
    .bind(&insight.insights)
    .bind(&insight.recommendations)
    .bind(&insight.key_metrics)
    .bind(&insight.next_steps)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetches the insight for a query, if one was produced.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_insight_for_query(
    pool: &PgPool,
    query_id: Uuid,
) -> Result<Option<InsightRow>, DbError> {
    let row = sqlx::query_as::<_, InsightRow>(
        "SELECT id, query_id, summary, insights, recommendations, \
                key_metrics, next_steps, created_at \
         FROM insights \
         WHERE query_id = $1",
    )
    .bind(query_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
