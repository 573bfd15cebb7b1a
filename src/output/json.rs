//! JSON report output

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputHandler, OutputResult};
use std::io::Write;

/// Writes the report as a single pretty-printed JSON document
pub struct JsonOutput<W: Write> {
    writer: W,
}

impl<W: Write> JsonOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for JsonOutput<W> {
    fn write_report(&mut self, report: &CrawlReport) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
