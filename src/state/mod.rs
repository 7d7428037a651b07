// State module - Run state management
// Counters shared between the stream reader and the supervisor

pub mod metrics;
pub mod result;

pub use metrics::ExecutionMetrics;
pub use result::{ChildExit, RunOutcome, RunReport};

use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};

/// Test counters updated by the stream reader while the child runs.
///
/// Values read before the reader task has been joined may be partial; the
/// supervisor only takes the final [`StatsSnapshot`] after that join.
#[derive(Debug, Default)]
pub struct RunStatistics {
    passed: AtomicU32,
    failed: AtomicU32,
    skipped: AtomicU32,
    total: AtomicU32,
}

impl RunStatistics {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished test
    pub fn record(&self, status: TestStatus) {
        let counter = match status {
            TestStatus::Pass => &self.passed,
            TestStatus::Fail => &self.failed,
            TestStatus::Skip => &self.skipped,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    /// Get passed tests
    pub fn passed(&self) -> u32 {
        self.passed.load(Ordering::SeqCst)
    }

    /// Get failed tests
    pub fn failed(&self) -> u32 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Get skipped tests
    pub fn skipped(&self) -> u32 {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Get total tests
    pub fn total(&self) -> u32 {
        self.total.load(Ordering::SeqCst)
    }

    /// Copy the current values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            passed: self.passed(),
            failed: self.failed(),
            skipped: self.skipped(),
            total: self.total(),
        }
    }
}

/// Plain copy of [`RunStatistics`] taken after the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
}

impl StatsSnapshot {
    /// Check if all tests passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Test status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}
