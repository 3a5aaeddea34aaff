//! Per-unit scan pipeline: compile errors first, then deprecated usages,
//! funnelled through one deduplicating [`Reporter`].

use crate::config::Config;
use crate::deprecation::{find_deprecated_usages, Finding};
use crate::discovery::SourceUnit;
use crate::frontend::{Diagnostics, FrontEnd, Severity};
use crate::report::{ErrorEntry, ReportStats, Reporter};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::io::{self, Write};
use tracing::{debug, trace, warn};

/// Everything one unit contributes to the report, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitReport {
    pub errors: Vec<ErrorEntry>,
    pub findings: Vec<Finding>,
    /// Set when the front-end could not build the unit's tree
    pub failure: Option<String>,
}

/// Front-end, diagnostics and filters; shared across rayon workers
struct Pipeline<F, D> {
    frontend: F,
    diagnostics: D,
    config: Config,
    progress: Option<ProgressBar>,
}

impl<F: FrontEnd, D: Diagnostics> Pipeline<F, D> {
    fn analyze(&self, unit: &SourceUnit) -> UnitReport {
        let mut report = UnitReport::default();
        let package = self.frontend.package_of(unit).unwrap_or_default();
        if !self.config.should_report_package(&package) {
            trace!("Package {:?} filtered out: {}", package, unit.path.display());
            self.tick();
            return report;
        }

        if self.config.report.errors {
            report.errors = self.errors_of(unit);
        }

        if self.config.report.deprecations {
            match self.frontend.parse(unit) {
                Ok(parsed) => report.findings = find_deprecated_usages(&parsed.tree),
                Err(e) => report.failure = Some(e.to_string()),
            }
        }

        self.tick();
        report
    }

    fn errors_of(&self, unit: &SourceUnit) -> Vec<ErrorEntry> {
        let markers = match self.diagnostics.diagnostics(unit) {
            Ok(markers) => markers,
            Err(e) => {
                warn!("Skipping compile errors of {}: {}", unit.path.display(), e);
                return Vec::new();
            }
        };

        let file_name = unit.file_name();
        let display_name = self
            .frontend
            .primary_type_name(unit)
            .unwrap_or_else(|| file_name.clone());

        markers
            .into_iter()
            .filter(|marker| marker.severity == Severity::Error)
            .map(|marker| ErrorEntry {
                unit: file_name.clone(),
                display_name: display_name.clone(),
                line: marker.line,
                message: marker.message,
            })
            .collect()
    }

    fn tick(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }
}

/// Drives a [`FrontEnd`] and a [`Diagnostics`] service over source units.
///
/// The reporter outlives front-ends: swap in the next project's front-end
/// with [`Scanner::set_front_end`] and dedup keeps spanning the run.
pub struct Scanner<F: FrontEnd, D: Diagnostics, W: Write> {
    pipeline: Pipeline<F, D>,
    reporter: Reporter<W>,
}

impl<F: FrontEnd, D: Diagnostics, W: Write> Scanner<F, D, W> {
    pub fn new(config: &Config, frontend: F, diagnostics: D, reporter: Reporter<W>) -> Self {
        Self {
            pipeline: Pipeline {
                frontend,
                diagnostics,
                config: config.clone(),
                progress: None,
            },
            reporter,
        }
    }

    /// Tick `progress` once per analyzed unit
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.pipeline.progress = Some(progress);
        self
    }

    pub fn set_front_end(&mut self, frontend: F) {
        self.pipeline.frontend = frontend;
    }

    pub fn set_progress(&mut self, progress: Option<ProgressBar>) {
        self.pipeline.progress = progress;
    }

    /// Collect the errors and findings of one unit without writing anything
    pub fn analyze(&self, unit: &SourceUnit) -> UnitReport {
        self.pipeline.analyze(unit)
    }

    /// Analyze one unit and write its report
    pub fn scan(&mut self, unit: &SourceUnit) -> io::Result<()> {
        let report = self.analyze(unit);
        self.emit(unit, &report)
    }

    /// Scan `units` in order. With `parallel`, units are analyzed on the
    /// rayon pool and their reports written afterwards in the same order,
    /// so the output matches a sequential run.
    pub fn scan_all(&mut self, units: &[SourceUnit], parallel: bool) -> io::Result<()> {
        if !parallel {
            for unit in units {
                self.scan(unit)?;
            }
            return Ok(());
        }

        debug!("Analyzing {} units in parallel", units.len());
        let pipeline = &self.pipeline;
        let reports: Vec<UnitReport> = units.par_iter().map(|unit| pipeline.analyze(unit)).collect();
        for (unit, report) in units.iter().zip(&reports) {
            self.emit(unit, report)?;
        }
        Ok(())
    }

    fn emit(&mut self, unit: &SourceUnit, report: &UnitReport) -> io::Result<()> {
        for entry in &report.errors {
            self.reporter.report_error(entry)?;
        }
        if let Some(failure) = &report.failure {
            warn!("Skipping {}: {}", unit.path.display(), failure);
        }
        for finding in &report.findings {
            self.reporter
                .report(Some(&finding.caller), Some(&finding.callee), finding.line)?;
        }
        Ok(())
    }

    /// Write a free-form line through the reporter
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.reporter.write_line(line)
    }

    /// Forget every reported key
    pub fn reset(&mut self) {
        self.reporter.reset();
    }

    pub fn stats(&self) -> ReportStats {
        self.reporter.stats()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.reporter.flush()
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }
}
