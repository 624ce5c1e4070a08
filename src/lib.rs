// Tue Jan 15 2026 - Alex

pub mod config;
pub mod memory;
pub mod orchestration;
pub mod output;
pub mod pattern;
pub mod ui;
pub mod utils;

pub use config::{ConfigFile, ScanConfig};
pub use memory::{LoadMode, ScanTarget};
pub use orchestration::{FileEnumerator, RunSummary, ScanOrchestrator};
pub use output::{ConsoleReporter, MatchCollector, MatchEvent, Reporter};
pub use pattern::{compile_template, PatternTemplate, TemplateCompiler, WindowMatcher};
