// Tue Jan 13 2026 - Alex

pub mod collector;
pub mod console;
pub mod error;
pub mod event;
pub mod json;

pub use collector::{MatchCollector, MatchRecord};
pub use console::ConsoleReporter;
pub use error::ReportError;
pub use event::{MatchEvent, NullReporter, Reporter, Tee};
pub use json::{JsonReport, TemplateInfo};
