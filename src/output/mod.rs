//! Output sink
//!
//! Each crawled page produces one record: the page URL followed by its
//! same-domain links in ascending order. The production sink writes records
//! to stdout under a process-wide lock so that records from concurrent
//! workers never interleave. The format is not a machine contract; a
//! structured writer can be substituted behind [`OutputSink`].

use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receiver of per-page crawl records.
///
/// `links` must already be sorted ascending; the sink writes them in the
/// order given.
pub trait OutputSink: Send + Sync {
    fn emit(&self, page: &str, links: &[String]) -> OutputResult<()>;
}

/// Sink writing human-readable records to standard output.
pub struct StdoutSink {
    stdout: Mutex<std::io::Stdout>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(std::io::stdout()),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdoutSink {
    fn emit(&self, page: &str, links: &[String]) -> OutputResult<()> {
        // Format outside the critical section; the lock covers only the
        // write of one complete record.
        let record = format_record(page, links);
        let mut out = match self.stdout.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(record.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Renders one record: a blank separator, the page header, then one
/// indented bullet per link.
pub fn format_record(page: &str, links: &[String]) -> String {
    let mut record = format!("\n{}  →  {} links\n", page, links.len());
    for link in links {
        record.push_str("   • ");
        record.push_str(link);
        record.push('\n');
    }
    record
}
