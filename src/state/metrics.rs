// Execution metrics

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Wall-clock timing of one child process
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionMetrics {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_duration_ms: u64,
    #[serde(skip)]
    started: Instant,
    #[serde(skip)]
    elapsed: Option<Duration>,
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::start()
    }
}

impl ExecutionMetrics {
    /// Start the timer now
    pub fn start() -> Self {
        Self {
            start_time: Utc::now(),
            end_time: None,
            total_duration_ms: 0,
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Stop the timer; later calls keep the first value
    pub fn finish(&mut self) {
        if self.elapsed.is_some() {
            return;
        }
        let elapsed = self.started.elapsed();
        self.elapsed = Some(elapsed);
        self.end_time = Some(Utc::now());
        self.total_duration_ms = elapsed.as_millis() as u64;
    }

    /// Elapsed time, up to now if the timer is still running
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }
}
