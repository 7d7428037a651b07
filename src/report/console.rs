// Console reporter - dot progress and extracted error messages

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use console::style;

use crate::config::ProgressMode;
use crate::state::{ChildExit, RunReport, TestStatus};

/// Console reporter
pub struct ConsoleReporter {
    mode: ProgressMode,
    wrap: usize,
    ticks: AtomicUsize,
}

impl ConsoleReporter {
    /// Create new console reporter
    pub fn new(mode: ProgressMode, wrap: usize) -> Self {
        Self {
            mode,
            wrap,
            ticks: AtomicUsize::new(0),
        }
    }

    /// Render the end-of-run summary
    pub fn render_summary(&self, report: &RunReport, out: &mut impl Write) -> io::Result<()> {
        let stats = report.stats;
        if stats.total == 0 {
            if !report.exit.success() {
                write_diagnostics(report, out)?;
            }
            writeln!(out, "no tests to run")?;
            return Ok(());
        }

        writeln!(out)?;

        if stats.failed > 0 {
            writeln!(out, "[Error Messages]")?;
            for group in &report.failures {
                for failure in &group.failures {
                    writeln!(out, " {}", failure.trim_end())?;
                }
                for diagnostic in &group.diagnostics {
                    writeln!(out, " {}", style(diagnostic.trim_end()).red())?;
                }
            }
        }

        writeln!(
            out,
            "Results: {}/{}/{} ({}/{}/{}, {})",
            style(stats.passed).green(),
            style(stats.failed).red(),
            style(stats.skipped).blue(),
            style("ok").green(),
            style("ng").red(),
            style("skip").blue(),
            format_duration(report.metrics.elapsed()),
        )
    }

    /// Render faults collected while streaming
    pub fn render_internal_errors(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
        if !report.has_internal_errors() {
            return Ok(());
        }

        writeln!(out, "[Internal Errors]")?;
        if let ChildExit::Signaled(_) = report.exit {
            writeln!(out, " go test {}", report.exit)?;
        }
        if let Some(fault) = &report.stream_fault {
            writeln!(out, " {}", fault)?;
        }
        for fault in &report.parse_faults {
            writeln!(out, " {}", fault)?;
        }
        for failure in &report.relay_failures {
            writeln!(out, " {}", failure)?;
        }
        Ok(())
    }

    fn tick_char(status: TestStatus) -> console::StyledObject<&'static str> {
        match status {
            TestStatus::Pass => style(".").green(),
            TestStatus::Fail => style(".").red(),
            TestStatus::Skip => style(".").blue(),
        }
    }
}

/// Retained output of a run that failed without reporting any test
fn write_diagnostics(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
    let lines: Vec<&String> = report
        .transcript
        .iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(());
    }

    writeln!(out, "[Error Messages]")?;
    for line in lines {
        writeln!(out, " {}", style(line).red())?;
    }
    Ok(())
}

/// Format a duration like `512ms` or `1.234s`
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

impl super::Reporter for ConsoleReporter {
    fn on_tick(&self, status: TestStatus) {
        if self.mode != ProgressMode::Dots {
            return;
        }

        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", Self::tick_char(status));

        let count = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if self.wrap > 0 && count % self.wrap == 0 {
            let _ = writeln!(stdout);
        }
        let _ = stdout.flush();
    }

    fn on_run_end(&self, report: &RunReport) -> anyhow::Result<()> {
        {
            let mut stdout = io::stdout().lock();
            self.render_summary(report, &mut stdout)?;
            stdout.flush()?;
        }

        let mut stderr = io::stderr().lock();
        Self::render_internal_errors(report, &mut stderr)?;
        Ok(())
    }
}
