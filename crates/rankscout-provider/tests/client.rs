//! Integration tests for `ProviderClient` using wiremock HTTP mocks.

use rankscout_provider::{ProviderClient, ProviderCodes, ProviderError};
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ProviderClient {
    ProviderClient::with_base_url(
        "login@example.com",
        "secret",
        30,
        ProviderCodes::default(),
        base_url,
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn post_tasks_submits_batch_and_parses_envelope() {
    let server = MockServer::start().await;

    let payloads = vec![
        serde_json::json!({ "keyword": "running shoes", "location_code": 2840 }),
        serde_json::json!({ "keyword": "trail shoes", "location_code": 2840 }),
    ];

    let body = serde_json::json!({
        "status_code": 20000,
        "status_message": "Ok.",
        "cost": 0.006,
        "tasks": [
            { "id": "11081545-1535-0066", "status_code": 20100, "status_message": "Task Created.", "cost": 0.003, "result": null },
            { "id": "11081545-1535-0067", "status_code": 20100, "status_message": "Task Created.", "cost": 0.003, "result": null }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/serp/google/organic/task_post"))
        .and(header_exists("authorization"))
        .and(body_json(&payloads))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let envelope = client
        .post_tasks("serp/google/organic", &payloads)
        .await
        .expect("should parse envelope");

    assert_eq!(envelope.status_code, 20_000);
    assert_eq!(envelope.tasks.len(), 2);
    assert_eq!(envelope.tasks[0].id, "11081545-1535-0066");
    assert!(envelope.tasks.iter().all(|t| t.result.is_none()));
}

#[tokio::test]
async fn get_task_returns_result_array_when_complete() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status_code": 20000,
        "status_message": "Ok.",
        "tasks": [
            {
                "id": "11081545-1535-0066",
                "status_code": 20000,
                "status_message": "Ok.",
                "cost": 0.003,
                "result": [
                    { "keyword": "running shoes", "items": [] }
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/serp/google/organic/task_get/11081545-1535-0066"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let envelope = client
        .get_task("serp/google/organic", "11081545-1535-0066")
        .await
        .expect("should parse envelope");

    let task = &envelope.tasks[0];
    assert!(client.codes().is_complete(task));
    let result = task.result.as_ref().expect("completed task carries result");
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn tasks_ready_lists_finished_ids() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status_code": 20000,
        "status_message": "Ok.",
        "tasks": [
            { "id": "a", "status_code": 20000, "status_message": "Ok." },
            { "id": "b", "status_code": 20000, "status_message": "Ok." }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/keywords_data/google_ads/search_volume/tasks_ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let envelope = client
        .tasks_ready("keywords_data/google_ads/search_volume")
        .await
        .expect("should parse envelope");

    let ids: Vec<&str> = envelope.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn envelope_error_code_surfaces_as_api_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status_code": 40100,
        "status_message": "Authentication failed.",
        "tasks": []
    });

    Mock::given(method("POST"))
        .and(path("/serp/google/organic/task_post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.post_tasks("serp/google/organic", &[]).await;

    match result {
        Err(ProviderError::Api { code, message }) => {
            assert_eq!(code, 40_100);
            assert!(message.contains("Authentication"));
        }
        other => panic!("expected ProviderError::Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_status_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serp/google/organic/tasks_ready"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.tasks_ready("serp/google/organic").await;
    assert!(matches!(result, Err(ProviderError::Http(_))));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serp/google/organic/tasks_ready"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.tasks_ready("serp/google/organic").await;
    assert!(matches!(result, Err(ProviderError::Deserialize { .. })));
}
