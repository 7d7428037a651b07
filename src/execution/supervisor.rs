// Supervisor - runs `go test` and feeds its output to the stream consumer

use std::io::{self, PipeWriter};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use futures::stream::Stream;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::args::test_args;
use super::error::RunError;
use crate::extract::extract_failures;
use crate::report::Reporter;
use crate::signal::{self, ChildProcess, RawSignal, SignalRelay};
use crate::state::{ChildExit, ExecutionMetrics, RunReport, RunStatistics};
use crate::stream::{LineFormat, StreamConsumer};

/// Runs one `go test` invocation
#[derive(Debug, Clone)]
pub struct Supervisor {
    program: PathBuf,
    args: Vec<String>,
    format: LineFormat,
}

impl Supervisor {
    /// Resolve `tool` on PATH and prepare its arguments
    pub fn new(tool: &str, caller_args: &[String], format: LineFormat) -> Result<Self, RunError> {
        let program = which::which(tool).map_err(|source| RunError::ToolNotFound {
            tool: tool.to_string(),
            source,
        })?;

        Ok(Self {
            program,
            args: test_args(caller_args, format),
            format,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the child, relaying signals received by this process
    pub async fn run(&self, reporter: Arc<dyn Reporter>) -> Result<RunReport, RunError> {
        let signals = match signal::listen() {
            Ok(signals) => Some(signals),
            Err(e) => {
                warn!("Signals will not be relayed to go test: {}", e);
                None
            }
        };
        self.run_with_signals(reporter, signals).await
    }

    /// Run the child, relaying signals from `signals`.
    ///
    /// The output reader is joined before counters and transcript are read, so
    /// the report always covers everything the child wrote.
    pub async fn run_with_signals<S>(
        &self,
        reporter: Arc<dyn Reporter>,
        signals: Option<S>,
    ) -> Result<RunReport, RunError>
    where
        S: Stream<Item = RawSignal> + Unpin + Send + 'static,
    {
        let (reader, writer) = io::pipe().map_err(RunError::Pipe)?;
        let stats = Arc::new(RunStatistics::new());

        let mut metrics = ExecutionMetrics::start();
        let mut child = self.spawn(writer)?;

        let consumer = StreamConsumer::new(self.format, stats.clone(), reporter);
        let reading = tokio::task::spawn_blocking(move || consumer.consume(reader));

        let target = child.id().map(ChildProcess::new);
        let relay = match (signals, &target) {
            (Some(signals), Some(target)) => Some(SignalRelay::spawn(signals, target.clone())),
            _ => None,
        };

        let waited = child.wait().await;
        metrics.finish();
        if let Some(target) = &target {
            target.mark_reaped();
        }

        let relay_failures = match relay {
            Some(relay) => relay.stop().await.failures,
            None => Vec::new(),
        };

        let status = waited.map_err(|source| RunError::Wait {
            program: self.program.display().to_string(),
            source,
        })?;
        let exit = ChildExit::from(status);
        debug!("go test finished: {} after {:?}", exit, metrics.elapsed());

        let summary = reading
            .await
            .map_err(|e| RunError::Reader(e.to_string()))?;

        if let Some(output) = summary.invalid_invocation() {
            return Err(RunError::InvalidInvocation(output));
        }

        let failures = extract_failures(&summary.transcript);
        Ok(RunReport {
            stats: stats.snapshot(),
            transcript: summary.transcript,
            failures,
            metrics,
            exit,
            stream_fault: summary.fault,
            parse_faults: summary.parse_faults,
            relay_failures,
        })
    }

    /// Start the child with stdout and stderr on the same pipe.
    ///
    /// The command holds the only copies of the write end besides the child;
    /// it is dropped on return so end of stream follows the child's exit.
    fn spawn(&self, writer: PipeWriter) -> Result<Child, RunError> {
        let stderr = writer.try_clone().map_err(RunError::Pipe)?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr)
            .kill_on_drop(true);

        debug!("Running {} {}", self.program.display(), self.args.join(" "));
        command.spawn().map_err(|source| RunError::Spawn {
            program: self.program.display().to_string(),
            source,
        })
    }
}
