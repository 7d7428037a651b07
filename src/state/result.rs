// Run result structures

use std::fmt;
use std::process::ExitStatus;

use crate::extract::FailureGroup;
use crate::signal::{RawSignal, RelayFailure, signal_name};
use crate::state::{ExecutionMetrics, StatsSnapshot};
use crate::stream::{ParseFault, StreamFault};

/// How a run ended, as seen by the caller choosing an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    TestsFailed,
    ExecutionFault,
}

/// How the child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    Code(i32),
    /// Terminated by a signal without exiting
    Signaled(RawSignal),
}

impl ChildExit {
    pub fn success(&self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Code(-1)
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit status {}", code),
            Self::Signaled(signal) => write!(f, "terminated by {}", signal_name(*signal)),
        }
    }
}

/// Everything known about a finished child process
#[derive(Debug)]
pub struct RunReport {
    pub stats: StatsSnapshot,
    /// Retained output lines in arrival order
    pub transcript: Vec<String>,
    /// Failure messages grouped by the scope that produced them
    pub failures: Vec<FailureGroup>,
    pub metrics: ExecutionMetrics,
    pub exit: ChildExit,
    pub stream_fault: Option<StreamFault>,
    pub parse_faults: Vec<ParseFault>,
    pub relay_failures: Vec<RelayFailure>,
}

impl RunReport {
    /// Outcome of the run
    pub fn outcome(&self) -> RunOutcome {
        if self.stream_fault.is_some() || matches!(self.exit, ChildExit::Signaled(_)) {
            RunOutcome::ExecutionFault
        } else if self.stats.failed > 0 || !self.exit.success() {
            RunOutcome::TestsFailed
        } else {
            RunOutcome::Success
        }
    }

    /// Failure messages as display lines
    pub fn failure_lines(&self) -> Vec<&str> {
        self.failures.iter().flat_map(|group| group.lines()).collect()
    }

    /// Whether any fault was collected while streaming
    pub fn has_internal_errors(&self) -> bool {
        self.stream_fault.is_some()
            || matches!(self.exit, ChildExit::Signaled(_))
            || !self.parse_faults.is_empty()
            || !self.relay_failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stats: StatsSnapshot, code: i32) -> RunReport {
        RunReport {
            stats,
            transcript: Vec::new(),
            failures: Vec::new(),
            metrics: ExecutionMetrics::start(),
            exit: ChildExit::Code(code),
            stream_fault: None,
            parse_faults: Vec::new(),
            relay_failures: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_success() {
        let stats = StatsSnapshot {
            passed: 2,
            total: 2,
            ..Default::default()
        };
        assert_eq!(report(stats, 0).outcome(), RunOutcome::Success);
    }

    #[test]
    fn test_outcome_failed_tests() {
        let stats = StatsSnapshot {
            passed: 1,
            failed: 1,
            total: 2,
            ..Default::default()
        };
        assert_eq!(report(stats, 1).outcome(), RunOutcome::TestsFailed);
    }

    #[test]
    fn test_outcome_nonzero_exit_without_failures() {
        assert_eq!(
            report(StatsSnapshot::default(), 2).outcome(),
            RunOutcome::TestsFailed
        );
    }

    #[test]
    fn test_outcome_signaled_child() {
        let mut report = report(StatsSnapshot::default(), 0);
        report.exit = ChildExit::Signaled(9);
        assert_eq!(report.outcome(), RunOutcome::ExecutionFault);
        assert!(!report.exit.success());
    }

    #[test]
    fn test_outcome_stream_fault() {
        let mut report = report(StatsSnapshot::default(), 0);
        report.stream_fault = Some(StreamFault {
            line_number: 3,
            error: std::io::Error::other("boom"),
        });
        assert_eq!(report.outcome(), RunOutcome::ExecutionFault);
        assert!(report.has_internal_errors());
    }
}
