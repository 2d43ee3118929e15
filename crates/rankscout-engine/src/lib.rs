//! Research orchestration engine.
//!
//! Coordinates many outstanding asynchronous operations against the
//! external rate-limited provider: the shared job ledger, the task
//! orchestrator, the summarization queue, the per-type workflow
//! controllers, and the background sweep/eviction scheduler.

mod error;
mod ledger;
mod orchestrator;
mod scheduler;
pub mod summarize;
pub mod workflows;

pub use error::EngineError;
pub use ledger::{JobEntry, Ledger};
pub use orchestrator::{TaskInfo, TaskOrchestrator};
pub use scheduler::build_scheduler;
pub use workflows::{run_query, WorkflowContext};
