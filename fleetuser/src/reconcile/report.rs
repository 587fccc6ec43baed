//! Run reporters: persisted log and console mirror.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use console::{Term, style};

use super::model::{Outcome, RunReport, Severity};
use crate::error::Result;

/// Consumes outcome records as devices complete.
///
/// The orchestrator is the only caller; records arrive one at a time in
/// device-list order.
pub trait RunReporter: Send {
    /// Record the outcome of one device.
    fn record(&mut self, outcome: &Outcome) -> Result<()>;

    /// Called once after the last device.
    fn finish(&mut self, _report: &RunReport) -> Result<()> {
        Ok(())
    }
}

/// Append-only log file with one line per device.
pub struct LogFileReporter {
    file: File,
}

impl LogFileReporter {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file })
    }

    /// Log line for one outcome.
    pub fn format_line(outcome: &Outcome) -> String {
        format!(
            "{} mode={} status={} {}",
            outcome.address(),
            outcome.mode(),
            outcome.kind().label(),
            outcome.message()
        )
    }
}

impl RunReporter for LogFileReporter {
    fn record(&mut self, outcome: &Outcome) -> Result<()> {
        writeln!(self.file, "{}", Self::format_line(outcome))?;
        self.file.flush()?;
        Ok(())
    }
}

/// Coloured mirror of the outcomes on a terminal.
pub struct ConsoleReporter {
    term: Term,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn with_term(term: Term) -> Self {
        Self { term }
    }

    /// Styled console line for one outcome.
    pub fn render(outcome: &Outcome) -> String {
        let message = outcome.message();
        match outcome.severity() {
            Severity::Success => style(message).green().to_string(),
            Severity::Notice => style(message).yellow().to_string(),
            Severity::Warning => style(message).red().to_string(),
            Severity::Error => style(message).red().bold().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter for ConsoleReporter {
    fn record(&mut self, outcome: &Outcome) -> Result<()> {
        self.term.write_line(&Self::render(outcome))?;
        Ok(())
    }

    fn finish(&mut self, report: &RunReport) -> Result<()> {
        let summary = report.summary();
        let line = if summary.has_problems() {
            style(summary.to_string()).yellow().bold()
        } else {
            style(summary.to_string()).bold()
        };
        self.term.write_line("")?;
        self.term.write_line(&line.to_string())?;
        Ok(())
    }
}

/// Forwards every call to each reporter in turn.
///
/// All reporters are called even if one fails; the first error is returned.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn RunReporter>>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl RunReporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn RunReporter) -> Result<()>) -> Result<()> {
        let mut first_error = None;
        for reporter in &mut self.reporters {
            if let Err(e) = f(reporter.as_mut()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl RunReporter for MultiReporter {
    fn record(&mut self, outcome: &Outcome) -> Result<()> {
        self.each(|reporter| reporter.record(outcome))
    }

    fn finish(&mut self, report: &RunReport) -> Result<()> {
        self.each(|reporter| reporter.finish(report))
    }
}
