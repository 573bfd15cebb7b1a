//! Context block for question-answering consumers
//!
//! Downstream chat layers feed crawled pages to a language model as one text
//! block: a header, then title, URL and a bounded content prefix for every
//! successfully fetched page.

use crate::crawler::{CrawlRecord, CrawlReport};
use crate::output::traits::{OutputHandler, OutputResult};
use std::io::Write;

/// Default number of content characters per page
pub const DEFAULT_CONTEXT_PREFIX_CHARS: usize = 2000;

const CONTEXT_HEADER: &str = "Based on the following website content:\n\n";
const EMPTY_CONTEXT: &str = "No website content available.";

/// Builds the context block from crawl records
///
/// Failed records are skipped. With no records at all the placeholder
/// "No website content available." is returned.
///
/// # Example
///
/// ```
/// use site_crawler::output::build_context;
///
/// assert_eq!(build_context(&[], 2000), "No website content available.");
/// ```
pub fn build_context(records: &[CrawlRecord], prefix_chars: usize) -> String {
    if records.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    let mut context = String::from(CONTEXT_HEADER);
    for record in records.iter().filter(|r| r.is_success()) {
        let prefix: String = record.content.chars().take(prefix_chars).collect();
        context.push_str(&format!("Title: {}\n", record.title));
        context.push_str(&format!("URL: {}\n", record.url));
        context.push_str(&format!("Content: {}...\n\n", prefix));
    }

    context
}

/// Writes the context block of a report
pub struct ContextOutput<W: Write> {
    writer: W,
    prefix_chars: usize,
}

impl<W: Write> ContextOutput<W> {
    pub fn new(writer: W, prefix_chars: usize) -> Self {
        Self {
            writer,
            prefix_chars,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for ContextOutput<W> {
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()> {
        let context = build_context(&report.records, self.prefix_chars);
        self.writer.write_all(context.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
