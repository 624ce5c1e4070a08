// Tue Jan 13 2026 - Alex

use crate::orchestration::coordinator::OrchestratorState;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Orchestrator is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: OrchestratorState,
        actual: OrchestratorState,
    },
    #[error("Scan root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}
