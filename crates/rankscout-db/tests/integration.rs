//! Offline unit tests for rankscout-db pool configuration and row types.
//! These tests do not require a live database connection.

use rankscout_core::{AppConfig, Environment};
use rankscout_db::{DatasetRow, PoolConfig, ResearchQueryRow, ResearchTaskRow};

fn test_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        provider_base_url: "https://api.dataforseo.com/v3".to_string(),
        provider_login: "login".to_string(),
        provider_password: "password".to_string(),
        provider_timeout_secs: 30,
        provider_success_code: 20_000,
        provider_error_threshold: 40_000,
        rate_limit_per_minute: 30,
        rate_limit_per_hour: 1500,
        summarizer_base_url: "http://localhost:1234".to_string(),
        summarizer_api_key: None,
        summarizer_model: "gpt-4o-mini".to_string(),
        summarizer_timeout_secs: 120,
        ledger_retention_secs: 21_600,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&test_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ResearchQueryRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn research_query_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = ResearchQueryRow {
        id: Uuid::new_v4(),
        query_type: "keyword_discovery".to_string(),
        parameters: serde_json::json!({ "seed_keywords": ["running shoes"] }),
        status: "pending".to_string(),
        progress: 0_i32,
        error_message: None,
        created_at: Utc::now(),
        completed_at: None,
    };

    assert_eq!(row.query_type, "keyword_discovery");
    assert_eq!(row.status, "pending");
    assert_eq!(row.progress, 0);
    assert!(row.completed_at.is_none());
}

#[test]
fn research_task_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let query_id = Uuid::new_v4();
    let row = ResearchTaskRow {
        id: Uuid::new_v4(),
        query_id,
        kind: "serp_organic".to_string(),
        status: "pending".to_string(),
        parameters: serde_json::json!({ "keyword": "running shoes" }),
        provider_task_id: "11081545-1535-0066".to_string(),
        result: None,
        created_at: Utc::now(),
        completed_at: None,
    };

    assert_eq!(row.query_id, query_id);
    assert_eq!(row.kind, "serp_organic");
    assert!(row.result.is_none());
}

#[test]
fn dataset_row_allows_combined_snapshots_without_task() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = DatasetRow {
        id: Uuid::new_v4(),
        query_id: Uuid::new_v4(),
        task_id: None,
        name: "keyword list".to_string(),
        kind: "keyword_list".to_string(),
        data: serde_json::json!([]),
        created_at: Utc::now(),
    };

    assert!(row.task_id.is_none());
    assert_eq!(row.name, "keyword list");
}
