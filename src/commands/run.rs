// Run command - execute `go test` and report the results

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::execution::Supervisor;
use crate::report::{self, Reporter};
use crate::state::RunOutcome;
use crate::stream::LineFormat;

pub async fn run_tests(cli: &Cli, config: &Config) -> Result<RunOutcome> {
    let format = if config.general.json {
        LineFormat::Json
    } else {
        LineFormat::Plain
    };

    let supervisor = Supervisor::new(&config.general.go_binary, &cli.go_test_args, format)?;
    info!("Using {}", supervisor.program().display());

    let reporter = Arc::new(report::ConsoleReporter::new(
        config.progress.progress_mode(),
        config.progress.wrap,
    ));

    let report = supervisor.run(reporter.clone()).await?;
    debug!(
        "Run finished: {} passed, {} failed, {} skipped",
        report.stats.passed, report.stats.failed, report.stats.skipped
    );

    reporter.on_run_end(&report)?;
    Ok(report.outcome())
}
