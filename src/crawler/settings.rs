//! Runtime settings for a crawl session

use crate::crawler::filter::FanoutCaps;
use crate::CrawlerError;
use std::time::Duration;

/// Browser-like identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Settings for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Maximum redirect hops before the fetch fails
    pub max_redirects: usize,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_redirects: 10,
            accept_invalid_certs: true,
        }
    }
}

/// Settings for one crawl session
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Link hops to follow from the seeds; 0 fetches the seeds only
    pub depth: u32,

    /// Hard cap on fetches per session
    pub max_pages: usize,

    /// Minimum interval between consecutive fetches
    pub delay: Duration,

    /// Per-page admission caps for discovered links
    pub fanout: FanoutCaps,

    /// Words that mark a link as navigational
    pub priority_keywords: Vec<String>,

    pub fetch: FetchSettings,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            depth: 1,
            max_pages: 20,
            delay: Duration::from_secs(1),
            fanout: FanoutCaps::default(),
            priority_keywords: crate::crawler::filter::DEFAULT_PRIORITY_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            fetch: FetchSettings::default(),
        }
    }
}

impl CrawlSettings {
    /// Converts a delay in seconds, rejecting negative or non-finite values
    pub fn delay_from_secs(seconds: f64) -> Result<Duration, CrawlerError> {
        Duration::try_from_secs_f64(seconds).map_err(|_| {
            CrawlerError::InvalidSettings(format!(
                "delay must be a finite, non-negative number of seconds, got {}",
                seconds
            ))
        })
    }

    /// Checks the settings before a session starts
    pub fn validate(&self) -> Result<(), CrawlerError> {
        if self.max_pages == 0 {
            return Err(CrawlerError::InvalidSettings(
                "max_pages must be at least 1".to_string(),
            ));
        }

        if self.fetch.timeout.is_zero() {
            return Err(CrawlerError::InvalidSettings(
                "fetch timeout must be greater than zero".to_string(),
            ));
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(CrawlerError::InvalidSettings(
                "user agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
