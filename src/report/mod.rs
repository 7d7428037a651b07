// Report module - Console output and reporting

pub mod console;

use crate::state::{RunReport, TestStatus};
use anyhow::Result;
pub use console::ConsoleReporter;

/// Reporter trait
pub trait Reporter: Send + Sync {
    /// Called for every finished test while output is still streaming
    fn on_tick(&self, status: TestStatus);

    /// Called once after the child exited and its output was drained
    fn on_run_end(&self, report: &RunReport) -> Result<()>;
}

/// Reporter that prints nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn on_tick(&self, _status: TestStatus) {}

    fn on_run_end(&self, _report: &RunReport) -> Result<()> {
        Ok(())
    }
}
