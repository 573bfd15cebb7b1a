//! Crawl statistics display
//!
//! This module formats the statistics block shown after a crawl.

use crate::crawler::{CrawlRecord, CrawlStats, FetchErrorKind};
use std::collections::BTreeMap;

/// Counts failed records by error kind
pub fn error_summary(records: &[CrawlRecord]) -> BTreeMap<&'static str, usize> {
    let mut summary = BTreeMap::new();
    for error in records.iter().filter_map(|r| r.status.error()) {
        *summary.entry(error_kind_label(error.kind)).or_insert(0) += 1;
    }
    summary
}

fn error_kind_label(kind: FetchErrorKind) -> &'static str {
    kind.as_str()
}

/// Formats statistics as a plain-text block
pub fn format_statistics(stats: &CrawlStats, records: &[CrawlRecord]) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str("Overview:\n");
    out.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    out.push_str(&format!("  Unique URLs visited: {}\n", stats.unique_urls_visited));
    out.push_str(&format!("  Configured depth: {}\n", stats.configured_depth));
    out.push_str(&format!(
        "  Configured page limit: {}\n",
        stats.configured_page_limit
    ));
    out.push_str(&format!("  Stopped because: {:?}\n\n", stats.stop_reason));

    let errors = error_summary(records);
    if !errors.is_empty() {
        out.push_str("Error Summary:\n");
        let mut counts: Vec<_> = errors.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        for (kind, count) in counts {
            out.push_str(&format!("  {}: {}\n", kind, count));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages successfully fetched)\n",
        stats.success_rate(),
        stats.succeeded,
        stats.pages_fetched
    ));

    out
}

/// Prints statistics to stderr, keeping stdout free for the report
pub fn print_statistics(stats: &CrawlStats, records: &[CrawlRecord]) {
    eprint!("{}", format_statistics(stats, records));
}
