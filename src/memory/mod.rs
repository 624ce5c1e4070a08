// Tue Jan 13 2026 - Alex

pub mod error;
pub mod target;

pub use error::MemoryError;
pub use target::{LoadMode, ScanTarget};
