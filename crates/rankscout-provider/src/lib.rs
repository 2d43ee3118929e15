//! Client-side plumbing for the asynchronous analysis provider.
//!
//! The provider exposes a task-based REST API: work is posted as a batch of
//! per-task payloads, then polled until each task reports a terminal status
//! code. This crate owns the HTTP client, the outbound rate limiter, the
//! response envelope types, and the per-domain adapters that build payloads
//! and normalize results.

pub mod adapters;
mod client;
mod error;
mod rate_limit;
mod types;

pub use client::ProviderClient;
pub use error::ProviderError;
pub use rate_limit::RateLimiter;
pub use types::{ProviderCodes, ProviderTask, TaskEnvelope};
