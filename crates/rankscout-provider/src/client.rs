//! HTTP client for the provider's task-based REST API.
//!
//! Wraps `reqwest` with Basic auth, bounded timeouts, and typed envelope
//! deserialization. Transport failures (timeout, connect, non-2xx) surface
//! as [`ProviderError::Http`] and are never retried here; the caller decides
//! what a failed submission or poll means for its workflow.

use std::time::Duration;

use crate::error::ProviderError;
use crate::types::{ProviderCodes, TaskEnvelope};

const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/v3";

/// Client for the provider's task API.
///
/// Use [`ProviderClient::new`] for production or
/// [`ProviderClient::with_base_url`] to point at a mock server in tests.
pub struct ProviderClient {
    client: reqwest::Client,
    base_url: String,
    login: String,
    password: String,
    codes: ProviderCodes,
}

impl ProviderClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        login: &str,
        password: &str,
        timeout_secs: u64,
        codes: ProviderCodes,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(login, password, timeout_secs, codes, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        login: &str,
        password: &str,
        timeout_secs: u64,
        codes: ProviderCodes,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankscout/0.1 (research-orchestration)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            login: login.to_owned(),
            password: password.to_owned(),
            codes,
        })
    }

    /// The status-code constants this client classifies responses with.
    #[must_use]
    pub fn codes(&self) -> ProviderCodes {
        self.codes
    }

    /// Submits a batch of task payloads to `POST {endpoint}/task_post`.
    ///
    /// The provider assigns each payload its own task id, returned in the
    /// envelope's `tasks` array in submission order.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`ProviderError::Api`] if the envelope status code is at or above
    ///   the error threshold.
    /// - [`ProviderError::Deserialize`] if the body is not a valid envelope.
    pub async fn post_tasks(
        &self,
        endpoint: &str,
        payloads: &[serde_json::Value],
    ) -> Result<TaskEnvelope, ProviderError> {
        let url = format!("{}/{endpoint}/task_post", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.login, Some(&self.password))
            .json(payloads)
            .send()
            .await?
            .error_for_status()?;
        self.parse_envelope(response, &url).await
    }

    /// Lists tasks that have finished since the last poll:
    /// `GET {endpoint}/tasks_ready`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ProviderClient::post_tasks`].
    pub async fn tasks_ready(&self, endpoint: &str) -> Result<TaskEnvelope, ProviderError> {
        let url = format!("{}/{endpoint}/tasks_ready", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.login, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;
        self.parse_envelope(response, &url).await
    }

    /// Fetches one task's current state and result:
    /// `GET {endpoint}/task_get/{id}`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ProviderClient::post_tasks`].
    pub async fn get_task(
        &self,
        endpoint: &str,
        provider_task_id: &str,
    ) -> Result<TaskEnvelope, ProviderError> {
        let url = format!("{}/{endpoint}/task_get/{provider_task_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.login, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;
        self.parse_envelope(response, &url).await
    }

    async fn parse_envelope(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<TaskEnvelope, ProviderError> {
        let body = response.text().await?;
        let envelope: TaskEnvelope =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: url.to_owned(),
                source: e,
            })?;

        if envelope.status_code >= self.codes.error_threshold {
            return Err(ProviderError::Api {
                code: envelope.status_code,
                message: envelope.status_message,
            });
        }

        Ok(envelope)
    }
}
