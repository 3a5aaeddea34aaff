mod errors;
mod seen;

pub use errors::ErrorEntry;
pub use seen::SeenKeys;

use std::io::{self, Write};

/// Counters for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Distinct deprecated-usage pairs written
    pub findings: usize,
    /// Findings suppressed because their key was already written
    pub duplicates: usize,
    /// Distinct compile errors written
    pub errors: usize,
}

/// Deduplicating text reporter.
///
/// Findings and compile errors are tracked in two independent key sets:
/// an error never suppresses a finding and vice versa. Both sets live as
/// long as the reporter, so one reporter per run gives run-wide dedup;
/// call [`Reporter::reset`] to start over.
pub struct Reporter<W: Write> {
    out: W,
    findings: SeenKeys<String>,
    errors: SeenKeys<String>,
    stats: ReportStats,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            findings: SeenKeys::new(),
            errors: SeenKeys::new(),
            stats: ReportStats::default(),
        }
    }

    /// Report a deprecated usage. Returns `true` when the pair was new and
    /// has been written; `None` on either side is ignored.
    pub fn report(&mut self, caller: Option<&str>, callee: Option<&str>, line: usize) -> io::Result<bool> {
        let (Some(caller), Some(callee)) = (caller, callee) else {
            return Ok(false);
        };

        let key = format!("{} -> {}", caller, callee);
        if !self.findings.insert(key) {
            self.stats.duplicates += 1;
            return Ok(false);
        }

        writeln!(self.out, "{}  (line {})", caller, line)?;
        writeln!(self.out, "  -> {}", callee)?;
        self.stats.findings += 1;
        Ok(true)
    }

    /// Report a compile error, once per `unit:line -> message`
    pub fn report_error(&mut self, entry: &ErrorEntry) -> io::Result<bool> {
        if !self.errors.insert(entry.key()) {
            return Ok(false);
        }

        writeln!(self.out, "{}", entry)?;
        self.stats.errors += 1;
        Ok(true)
    }

    /// Write a free-form line, e.g. a project header
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    /// Forget every key seen so far
    pub fn reset(&mut self) {
        self.findings.clear();
        self.errors.clear();
    }

    pub fn stats(&self) -> ReportStats {
        self.stats
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
