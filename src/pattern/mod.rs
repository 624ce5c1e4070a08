// Tue Jan 13 2026 - Alex

pub mod error;
pub mod matcher;
pub mod source;
pub mod symbol;
pub mod template;

pub use error::PatternError;
pub use matcher::{capture_window, matches_window, WindowMatcher};
pub use source::PatternSource;
pub use symbol::{SymbolId, SymbolTable};
pub use template::{compile_template, PatternTemplate, TemplateCompiler};
