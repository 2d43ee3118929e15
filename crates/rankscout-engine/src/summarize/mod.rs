//! Summarization: template rendering, the backend client, and the job
//! queue that fronts it with the same ledger lifecycle as provider tasks.

mod client;
mod queue;
mod template;

pub use client::{Effort, Impact, Priority, Recommendation, SummarizerClient, SummaryOutput};
pub use queue::{SummarizationQueue, SummaryJobInfo};
pub use template::{render, template, SummaryTemplate};
