//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! errors they report.

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a finished crawl report somewhere
pub trait OutputHandler {
    /// Writes the complete report
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()>;
}
