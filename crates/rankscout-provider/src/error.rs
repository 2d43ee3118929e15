use thiserror::Error;

/// Errors returned by the provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS, timeout, or non-2xx HTTP failure. Propagated to the
    /// caller as-is; the client never retries internally.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The top-level envelope carried a status code at or above the
    /// configured error threshold.
    #[error("provider API error {code}: {message}")]
    Api { code: u32, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
