//! HTTP client for the summarization backend.
//!
//! One chat-completion call per job: a system instruction plus the rendered
//! prompt in, a strict JSON document out. Anything that is not valid JSON
//! with the required keys is a hard failure — there is no partial parse.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The structured document the backend must return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, rename = "keyMetrics")]
    pub key_metrics: Option<serde_json::Value>,
    #[serde(default, rename = "nextSteps")]
    pub next_steps: Option<Vec<String>>,
}

/// One actionable recommendation with closed-vocabulary ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub effort: Effort,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Quick,
    Moderate,
    Significant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for the chat-completions-style summarization API.
pub struct SummarizerClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl SummarizerClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Summarization`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EngineError::Summarization(format!("client construction failed: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: model.to_owned(),
        })
    }

    /// Runs one summarization call and parses the strict JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Summarization`] on transport failure, a
    /// non-2xx status, or a response body that is not the required JSON
    /// shape.
    pub async fn summarize(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<SummaryOutput, EngineError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.3,
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Summarization(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EngineError::Summarization(format!(
                "backend returned status {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Summarization(format!("response parse error: {e}")))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| EngineError::Summarization("response carried no choices".to_owned()))?;

        parse_summary_document(content)
    }
}

/// Parse the model's content string into a [`SummaryOutput`].
///
/// Tolerates a ```json fence around the document but nothing else.
fn parse_summary_document(content: &str) -> Result<SummaryOutput, EngineError> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(trimmed)
        .map_err(|e| EngineError::Summarization(format!("malformed summary document: {e}")))
}
