// Tue Jan 13 2026 - Alex

pub mod aggregator;
pub mod coordinator;
pub mod discovery;
pub mod error;
pub mod queue;

pub use aggregator::{RunAggregate, RunSummary};
pub use coordinator::{OrchestratorState, ScanOrchestrator};
pub use discovery::{parse_extension_list, FileEnumerator};
pub use error::OrchestratorError;
pub use queue::WorkQueue;
