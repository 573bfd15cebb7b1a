//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a crawl,
//! including overall statistics, failures, and one section per page.

use crate::crawler::{CrawlRecord, CrawlReport};
use crate::output::traits::{OutputHandler, OutputResult};
use std::io::Write;

/// Characters of page content shown per page in the report
const EXCERPT_CHARS: usize = 500;

/// Writes the report as markdown
pub struct MarkdownOutput<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for MarkdownOutput<W> {
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()> {
        let markdown = format_markdown_report(report);
        self.writer.write_all(markdown.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    md.push_str("# Site Crawl Report\n\n");

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.pages_fetched));
    md.push_str(&format!(
        "- **Unique URLs Visited**: {}\n",
        stats.unique_urls_visited
    ));
    md.push_str(&format!("- **Configured Depth**: {}\n", stats.configured_depth));
    md.push_str(&format!(
        "- **Configured Page Limit**: {}\n",
        stats.configured_page_limit
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}% ({} / {})\n",
        stats.success_rate(),
        stats.succeeded,
        stats.pages_fetched
    ));
    md.push_str(&format!("- **Stopped Because**: {:?}\n\n", stats.stop_reason));

    // Failures
    let failures: Vec<&CrawlRecord> = report.records.iter().filter(|r| !r.is_success()).collect();
    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Depth | Status |\n");
        md.push_str("|-----|-------|--------|\n");
        for record in &failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                record.url,
                record.depth,
                escape_table_cell(&record.status.to_string())
            ));
        }
        md.push('\n');
    }

    // Pages
    md.push_str("## Pages\n\n");
    for record in report.successes() {
        md.push_str(&format!("### {}\n\n", record.title));
        md.push_str(&format!("- **URL**: {}\n", record.url));
        md.push_str(&format!("- **Depth**: {}\n", record.depth));
        md.push_str(&format!(
            "- **Fetched**: {}\n\n",
            record.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if !record.content.is_empty() {
            let excerpt: String = record.content.chars().take(EXCERPT_CHARS).collect();
            md.push_str(&format!("> {}\n\n", excerpt));
        }

        if let Some(links) = &record.links {
            md.push_str(&format!("Discovered links ({}):\n\n", links.len()));
            for link in links {
                md.push_str(&format!("- {}\n", link));
            }
            md.push('\n');
        }
    }

    md
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
