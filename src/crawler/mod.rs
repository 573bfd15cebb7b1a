//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a politeness throttle
//! - HTML parsing, text cleaning and link extraction
//! - Link eligibility filtering and priority caps
//! - The breadth-first frontier and overall crawl coordination

mod coordinator;
mod fetcher;
mod filter;
mod parser;
mod record;
mod scheduler;
mod settings;
mod throttle;

pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchErrorKind, FetchedPage, Fetcher};
pub use filter::{
    eligible_links, is_eligible, prioritize_links, FanoutCaps, KeywordScorer, LinkPriority,
    LinkScorer, DEFAULT_PRIORITY_KEYWORDS,
};
pub use parser::{clean_text, extract_links, parse_page, ParsedPage, MAX_CONTENT_CHARS, NO_TITLE};
pub use record::{CrawlRecord, CrawlReport, CrawlStats, PageStatus, StopReason};
pub use scheduler::{Frontier, FrontierEntry};
pub use settings::{CrawlSettings, FetchSettings, DEFAULT_USER_AGENT};
pub use throttle::Throttle;
