//! Site-Crawler: a same-site, depth-bounded web crawler
//!
//! This crate walks a website breadth-first from a set of seed URLs, staying on
//! the seed's host, and turns every visited page into a uniform content record
//! (title, cleaned text, status, depth and discovered links) for downstream
//! consumers such as question-answering layers.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Crawler operations
///
/// Per-page fetch failures are never reported through this type; they are
/// recorded on the page's [`crawler::CrawlRecord`] instead.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl settings: {0}")]
    InvalidSettings(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid session transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SessionPhase,
        to: state::SessionPhase,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Site-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlRecord, CrawlReport, CrawlSettings, CrawlStats, Crawler, PageStatus};
pub use state::{CrawlSession, SessionPhase};
pub use crate::url::{normalize_url, site_host};
