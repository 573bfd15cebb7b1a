//! Output module for writing crawl reports
//!
//! This module handles:
//! - Exporting the report as JSON, markdown, or a model context block
//! - Formatting crawl statistics for the terminal

mod context;
mod json;
mod markdown;
pub mod stats;
mod traits;

pub use context::{build_context, ContextOutput, DEFAULT_CONTEXT_PREFIX_CHARS};
pub use json::JsonOutput;
pub use markdown::{format_markdown_report, MarkdownOutput};
pub use stats::{error_summary, format_statistics, print_statistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
