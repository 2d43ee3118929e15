//! Integration tests for the summarization queue against a wiremock backend.

use std::time::Duration;

use rankscout_core::QueryStatus;
use rankscout_engine::summarize::{SummarizationQueue, SummarizerClient};
use rankscout_engine::EngineError;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn queue(base_url: &str) -> SummarizationQueue {
    let client = SummarizerClient::new(base_url, None, "test-model", 5)
        .expect("client construction should not fail");
    SummarizationQueue::new(client)
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

fn valid_document() -> String {
    serde_json::json!({
        "summary": "Two strong keywords dominate the set.",
        "insights": ["December is the only peak month."],
        "recommendations": [{
            "title": "Publish seasonal content early",
            "description": "Target the December spike from October.",
            "priority": "high",
            "effort": "moderate",
            "impact": "high"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn enqueued_job_completes_with_parsed_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(&valid_document())))
        .mount(&server)
        .await;

    let queue = queue(&server.uri());
    let owner = Uuid::new_v4();
    let job = queue.enqueue(owner, "system instruction", "rendered prompt");

    let outputs = queue
        .wait_for_all(&[job], Duration::from_secs(5), Duration::from_millis(20))
        .await
        .expect("job should complete");

    let output = outputs.get(&job).expect("output should be present");
    assert_eq!(output.summary, "Two strong keywords dominate the set.");
    assert_eq!(output.recommendations.len(), 1);
    assert_eq!(queue.status(job), Some(QueryStatus::Completed));
}

#[tokio::test]
async fn malformed_document_fails_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_body("Sure! Here's a summary: ...")),
        )
        .mount(&server)
        .await;

    let queue = queue(&server.uri());
    let job = queue.enqueue(Uuid::new_v4(), "system", "prompt");

    let result = queue
        .wait_for_all(&[job], Duration::from_secs(5), Duration::from_millis(20))
        .await;

    assert!(matches!(result, Err(EngineError::JobFailed { .. })));
    assert_eq!(queue.status(job), Some(QueryStatus::Failed));
}

#[tokio::test]
async fn backend_error_status_fails_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let queue = queue(&server.uri());
    let job = queue.enqueue(Uuid::new_v4(), "system", "prompt");

    let result = queue
        .wait_for_all(&[job], Duration::from_secs(5), Duration::from_millis(20))
        .await;
    assert!(matches!(result, Err(EngineError::JobFailed { .. })));
}

#[tokio::test]
async fn wait_times_out_when_the_backend_is_slow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body(&valid_document()))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let queue = queue(&server.uri());
    let job = queue.enqueue(Uuid::new_v4(), "system", "prompt");

    let result = queue
        .wait_for_all(&[job], Duration::from_millis(100), Duration::from_millis(20))
        .await;

    match result {
        Err(EngineError::Timeout { pending, .. }) => assert_eq!(pending, 1),
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_job_id_is_rejected() {
    let server = MockServer::start().await;
    let queue = queue(&server.uri());
    assert!(matches!(
        queue.result(Uuid::new_v4()),
        Err(EngineError::UnknownJob(_))
    ));
}
