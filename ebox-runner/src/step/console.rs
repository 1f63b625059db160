//! Step console
//!
//! Human-facing output of a single step, kept alongside the tracing events so
//! the job report can show what each step printed.

use ebox_core::domain::log::{LogEntry, LogLevel};
use tracing::{error, info, warn};

/// Console lines of one step
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    step_id: String,
    entries: Vec<LogEntry>,
}

impl StepLog {
    pub fn new(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(step = %self.step_id, "{}", message);
        self.entries.push(LogEntry::new(LogLevel::Info, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(step = %self.step_id, "{}", message);
        self.entries.push(LogEntry::new(LogLevel::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!(step = %self.step_id, "{}", message);
        self.entries.push(LogEntry::new(LogLevel::Error, message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Takes every entry out of the log
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }
}
