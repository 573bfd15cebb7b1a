//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Seeding a fresh session
//! - Pulling entries from the breadth-first frontier
//! - Fetching, parsing and link extraction
//! - Filtering, prioritizing and enqueueing discovered links
//! - Assembling the final report

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::filter::{eligible_links, prioritize_links, KeywordScorer, LinkScorer};
use crate::crawler::parser::{extract_document_links, parse_document};
use crate::crawler::record::{CrawlRecord, CrawlReport, PageStatus};
use crate::crawler::scheduler::FrontierEntry;
use crate::crawler::settings::CrawlSettings;
use crate::state::CrawlSession;
use crate::CrawlerError;
use chrono::Utc;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Same-site breadth-first crawler
///
/// A crawler runs one session at a time: [`Crawler::crawl`] takes `&mut self`
/// and keeps all session state in a local [`CrawlSession`].
pub struct Crawler {
    settings: CrawlSettings,
    fetcher: Fetcher,
    scorer: Box<dyn LinkScorer>,
}

impl Crawler {
    /// Creates a crawler after validating its settings
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlerError)` - Invalid settings or HTTP client failure
    pub fn new(settings: CrawlSettings) -> Result<Self, CrawlerError> {
        settings.validate()?;

        let fetcher = Fetcher::new(&settings.fetch, settings.delay)?;
        let scorer = Box::new(KeywordScorer::new(&settings.priority_keywords));

        Ok(Self {
            settings,
            fetcher,
            scorer,
        })
    }

    /// Replaces the link priority scorer
    pub fn with_scorer(mut self, scorer: impl LinkScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Runs one crawl session over the given seeds
    ///
    /// # Session Flow
    ///
    /// 1. Seed the frontier with the normalized seeds at depth 0
    /// 2. While the frontier is non-empty and budget remains:
    ///    a. Pop the oldest entry, skipping visited URLs
    ///    b. Fetch it once the politeness delay allows
    ///    c. Parse title and text; extract links if below the depth limit
    ///    d. Record the page and spend one unit of budget
    ///    e. Enqueue capped navigational links, then capped content links
    /// 3. Return the records with summary statistics
    ///
    /// Per-page failures are recorded, never returned as errors.
    pub async fn crawl<S: AsRef<str>>(&mut self, seeds: &[S]) -> Result<CrawlReport, CrawlerError> {
        let mut session = CrawlSession::new(seeds, self.settings.depth, self.settings.max_pages);

        tracing::info!(
            "Starting crawl: {} seeds, depth {}, max {} pages, delay {:?}",
            seeds.len(),
            self.settings.depth,
            self.settings.max_pages,
            self.fetcher.delay()
        );
        let start_time = std::time::Instant::now();

        while let Some(entry) = session.next_entry()? {
            let expand = session.should_expand(entry.depth);
            let (record, admitted) = self.visit(&entry, expand, session.visited()).await;

            if let Some(admitted) = admitted {
                tracing::debug!(
                    "Enqueueing {} links from {} at depth {}",
                    admitted.len(),
                    entry.url,
                    entry.depth + 1
                );
                session.enqueue_links(admitted, entry.depth);
            }

            session.record(record);

            let fetched = session.records().len();
            if fetched % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages fetched, {} in frontier, {} budget left",
                    fetched,
                    session.frontier_size(),
                    session.budget_remaining()
                );
            }
        }

        let phase = session.phase();
        let (records, stats) = session.finish()?;

        tracing::info!(
            "Crawl finished ({}): {} pages fetched, {} succeeded, in {:?}",
            phase,
            stats.pages_fetched,
            stats.succeeded,
            start_time.elapsed()
        );

        Ok(CrawlReport { records, stats })
    }

    /// Fetches and processes a single frontier entry
    ///
    /// Returns the page's record and, when links were extracted, the links
    /// admitted to the frontier.
    async fn visit(
        &mut self,
        entry: &FrontierEntry,
        expand: bool,
        visited: &HashSet<String>,
    ) -> (CrawlRecord, Option<Vec<String>>) {
        tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);

        match self.fetcher.fetch(&entry.url).await {
            Ok(page) => self.process_page(entry, page, expand, visited),
            Err(error) => {
                tracing::warn!("Failed to fetch {}: {}", entry.url, error);
                (CrawlRecord::failed(entry.url.clone(), entry.depth, error), None)
            }
        }
    }

    /// Parses a fetched page and selects the links to follow
    fn process_page(
        &self,
        entry: &FrontierEntry,
        page: FetchedPage,
        expand: bool,
        visited: &HashSet<String>,
    ) -> (CrawlRecord, Option<Vec<String>>) {
        let fetched_at = Utc::now();
        let html = String::from_utf8_lossy(&page.body);
        let document = Html::parse_document(&html);
        let parsed = parse_document(&document);

        tracing::debug!(
            "Fetched {} (HTTP {}, {} bytes, content type {:?})",
            entry.url,
            page.status_code,
            page.body.len(),
            page.content_type
        );

        let (links, admitted) = if expand && !page.is_html() {
            tracing::debug!(
                "Not extracting links from {}: content type {}",
                entry.url,
                page.content_type
            );
            (Some(Vec::new()), None)
        } else if expand {
            let eligible = self.discover_links(&document, entry, &page.final_url, visited);
            let admitted = prioritize_links(&eligible, self.scorer.as_ref(), self.settings.fanout);
            (Some(eligible), Some(admitted))
        } else {
            (None, None)
        };

        let record = CrawlRecord {
            url: entry.url.clone(),
            title: parsed.title,
            content: parsed.content,
            status: PageStatus::Success,
            depth: entry.depth,
            links,
            fetched_at,
        };

        (record, admitted)
    }

    /// Extracts the page's links and keeps the eligible same-site ones
    ///
    /// Relative links resolve against the final (post-redirect) URL; the
    /// same-site check is made against the URL that was scheduled.
    fn discover_links(
        &self,
        document: &Html,
        entry: &FrontierEntry,
        final_url: &str,
        visited: &HashSet<String>,
    ) -> Vec<String> {
        let resolve_base = Url::parse(final_url).or_else(|_| Url::parse(&entry.url));
        let Ok(resolve_base) = resolve_base else {
            tracing::debug!("Cannot resolve links for {}", entry.url);
            return Vec::new();
        };

        let candidates = extract_document_links(document, &resolve_base);
        let eligible = eligible_links(&candidates, &entry.url, visited);

        tracing::debug!(
            "{}: {} candidate links, {} eligible",
            entry.url,
            candidates.len(),
            eligible.len()
        );

        eligible
    }
}

/// Runs a single crawl with the given settings
///
/// # Example
///
/// ```no_run
/// use site_crawler::crawler::{run_crawl, CrawlSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(CrawlSettings::default(), &["https://example.com/"]).await?;
/// println!("Fetched {} pages", report.stats.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<S: AsRef<str>>(
    settings: CrawlSettings,
    seeds: &[S],
) -> Result<CrawlReport, CrawlerError> {
    let mut crawler = Crawler::new(settings)?;
    crawler.crawl(seeds).await
}
