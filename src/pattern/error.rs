// Tue Jan 13 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
    #[error("Element width must be greater than zero")]
    InvalidElementWidth,
    #[error("Template span overflows: {length} elements of stride {stride}")]
    SpanOverflow { length: usize, stride: usize },
    #[error("Failed to read pattern source {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
