//! Per-session crawl state
//!
//! A [`CrawlSession`] is created at the start of every crawl and dropped when
//! the report is returned. It owns the frontier, the visited set and the page
//! budget; nothing else can touch them while the session runs.

use crate::crawler::{CrawlRecord, CrawlStats, Frontier, FrontierEntry, StopReason};
use crate::state::SessionPhase;
use crate::url::normalize_url;
use crate::CrawlerError;
use std::collections::HashSet;

/// Mutable state of one crawl session
#[derive(Debug)]
pub struct CrawlSession {
    frontier: Frontier,
    visited: HashSet<String>,
    budget_remaining: usize,
    configured_depth: u32,
    configured_page_limit: usize,
    phase: SessionPhase,
    records: Vec<CrawlRecord>,
}

impl CrawlSession {
    /// Creates a session and seeds the frontier at depth 0, in input order
    pub fn new<S: AsRef<str>>(seeds: &[S], depth: u32, page_limit: usize) -> Self {
        let mut frontier = Frontier::new();
        for seed in seeds {
            frontier.push(FrontierEntry::new(normalize_url(seed.as_ref()), 0));
        }

        Self {
            frontier,
            visited: HashSet::new(),
            budget_remaining: page_limit,
            configured_depth: depth,
            configured_page_limit: page_limit,
            phase: SessionPhase::Idle,
            records: Vec::new(),
        }
    }

    /// Moves the session to a new phase
    pub fn transition(&mut self, next: SessionPhase) -> Result<(), CrawlerError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Session phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Pops the next frontier entry that has not been visited yet
    ///
    /// Returns `None` once the budget is spent or the frontier is empty, and
    /// moves the session into the matching stop phase. Entries whose URL was
    /// already visited are discarded without consuming budget.
    pub fn next_entry(&mut self) -> Result<Option<FrontierEntry>, CrawlerError> {
        if self.phase.is_stopped() {
            return Ok(None);
        }

        loop {
            if self.budget_remaining == 0 {
                self.transition(SessionPhase::BudgetExhausted)?;
                return Ok(None);
            }

            let Some(entry) = self.frontier.pop() else {
                self.transition(SessionPhase::FrontierEmpty)?;
                return Ok(None);
            };

            if self.visited.contains(&entry.url) {
                tracing::debug!("Skipping already visited URL: {}", entry.url);
                continue;
            }

            if self.phase == SessionPhase::Idle {
                self.transition(SessionPhase::Running)?;
            }

            self.visited.insert(entry.url.clone());
            return Ok(Some(entry));
        }
    }

    /// Whether a page at `depth` should have its links extracted
    pub fn should_expand(&self, depth: u32) -> bool {
        depth < self.configured_depth
    }

    /// Appends a record and spends one unit of budget
    pub fn record(&mut self, record: CrawlRecord) {
        self.records.push(record);
        self.budget_remaining = self.budget_remaining.saturating_sub(1);
    }

    /// Enqueues admitted links one level below `parent_depth`
    pub fn enqueue_links(&mut self, links: Vec<String>, parent_depth: u32) {
        self.frontier.extend_links(links, parent_depth + 1);
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn budget_remaining(&self) -> usize {
        self.budget_remaining
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn records(&self) -> &[CrawlRecord] {
        &self.records
    }

    /// Closes the session and returns its records and statistics
    pub fn finish(mut self) -> Result<(Vec<CrawlRecord>, CrawlStats), CrawlerError> {
        if !self.phase.is_stopped() {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: SessionPhase::Done,
            });
        }
        let stop_reason = if self.phase == SessionPhase::BudgetExhausted {
            StopReason::BudgetExhausted
        } else {
            StopReason::FrontierEmpty
        };
        self.transition(SessionPhase::Done)?;

        let succeeded = self.records.iter().filter(|r| r.is_success()).count();
        let stats = CrawlStats {
            pages_fetched: self.records.len(),
            unique_urls_visited: self.visited.len(),
            configured_depth: self.configured_depth,
            configured_page_limit: self.configured_page_limit,
            succeeded,
            failed: self.records.len() - succeeded,
            stop_reason,
        };

        Ok((self.records, stats))
    }
}
