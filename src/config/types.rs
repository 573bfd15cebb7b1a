use crate::crawler::{
    CrawlSettings, FanoutCaps, FetchSettings, DEFAULT_PRIORITY_KEYWORDS, DEFAULT_USER_AGENT,
};
use crate::CrawlerError;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Crawler
///
/// Every section is optional; missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed URLs, crawled in this order
    pub seeds: Vec<String>,
    pub crawler: CrawlerConfig,
    pub links: LinksConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Converts the configuration into runtime crawl settings
    pub fn crawl_settings(&self) -> Result<CrawlSettings, CrawlerError> {
        Ok(CrawlSettings {
            depth: self.crawler.depth,
            max_pages: self.crawler.max_pages,
            delay: CrawlSettings::delay_from_secs(self.crawler.delay_seconds)?,
            fanout: FanoutCaps {
                navigational: self.links.navigational_cap,
                content: self.links.content_cap,
            },
            priority_keywords: self.links.priority_keywords.clone(),
            fetch: FetchSettings {
                user_agent: self.fetcher.user_agent.clone(),
                timeout: Duration::from_secs(self.fetcher.timeout_seconds),
                max_redirects: self.fetcher.max_redirects,
                accept_invalid_certs: self.fetcher.accept_invalid_certs,
            },
        })
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Link hops to follow from the seeds (0 = seeds only)
    pub depth: u32,

    /// Maximum number of pages fetched per session
    pub max_pages: usize,

    /// Minimum time between requests (seconds)
    pub delay_seconds: f64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            max_pages: 20,
            delay_seconds: 1.0,
        }
    }
}

/// Link prioritization configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LinksConfig {
    /// Navigational links admitted per page
    pub navigational_cap: usize,

    /// Content links admitted per page
    pub content_cap: usize,

    /// URL substrings that mark a link as navigational
    pub priority_keywords: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            navigational_cap: 3,
            content_cap: 7,
            priority_keywords: DEFAULT_PRIORITY_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout_seconds: u64,

    /// Redirect hops followed before giving up
    pub max_redirects: usize,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            max_redirects: 10,
            accept_invalid_certs: true,
        }
    }
}

/// Report format written after a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
    Context,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Report file; stdout when absent
    pub path: Option<String>,

    /// Characters of content per page in the context block
    pub context_prefix_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            path: None,
            context_prefix_chars: 2000,
        }
    }
}
