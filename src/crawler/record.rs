//! Crawl output records
//!
//! A crawl session produces one [`CrawlRecord`] per visited URL, plus a
//! [`CrawlStats`] summary. Both are plain serializable values that external
//! layers consume unchanged.

use crate::crawler::fetcher::FetchError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome of fetching a single page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// The page was fetched and parsed
    Success,

    /// The fetch failed; the error carries a machine-readable kind
    Error(FetchError),
}

impl PageStatus {
    /// Returns true if this represents a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the fetch error, if any
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Success => None,
            Self::Error(e) => Some(e),
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error(e) => write!(f, "error[{}]: {}", e.kind, e.message),
        }
    }
}

/// One visited URL and what was extracted from it
///
/// Records are never modified after the scheduler creates them.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRecord {
    /// Normalized URL, unique within the session
    pub url: String,

    /// Page title, "No title" when the page has none, empty on failure
    pub title: String,

    /// Cleaned visible text, at most 10,000 characters, empty on failure
    pub content: String,

    /// Fetch outcome
    pub status: PageStatus,

    /// Traversal level at which the URL was fetched
    pub depth: u32,

    /// Eligible same-site links found on the page
    ///
    /// Only present when link extraction was requested for this fetch and the
    /// page was fetched successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl CrawlRecord {
    /// Builds the record for a page that could not be fetched
    pub fn failed(url: String, depth: u32, error: FetchError) -> Self {
        Self {
            url,
            title: String::new(),
            content: String::new(),
            status: PageStatus::Error(error),
            depth,
            links: None,
            fetched_at: Utc::now(),
        }
    }

    /// Returns true if the page was fetched successfully
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The page budget reached zero
    BudgetExhausted,

    /// There was nothing left to fetch
    FrontierEmpty,
}

/// Summary statistics for one crawl session
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub unique_urls_visited: usize,
    pub configured_depth: u32,
    pub configured_page_limit: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub stop_reason: StopReason,
}

impl CrawlStats {
    /// Percentage of fetched pages that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.pages_fetched as f64) * 100.0
        }
    }
}

/// Everything a crawl session returns
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Records in fetch order
    pub records: Vec<CrawlRecord>,

    pub stats: CrawlStats,
}

impl CrawlReport {
    /// Iterates over the successfully fetched records
    pub fn successes(&self) -> impl Iterator<Item = &CrawlRecord> {
        self.records.iter().filter(|r| r.is_success())
    }
}
