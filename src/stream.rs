// Stream consumer - reads merged child output line by line

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::classify::{classify, transcript_line};
use crate::event::TestEvent;
use crate::report::Reporter;
use crate::state::RunStatistics;

/// How each line of the stream is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `go test -json` records
    Json,
    /// Plain `go test -v` text
    Plain,
}

/// A line that could not be decoded as a test event
#[derive(Debug, Clone, Error)]
#[error("line {line_number}: {message} (input: {line:?})")]
pub struct ParseFault {
    pub line_number: usize,
    pub line: String,
    pub message: String,
}

/// Read error that ended consumption early
#[derive(Debug, Error)]
#[error("failed to read test output after line {line_number}: {error}")]
pub struct StreamFault {
    pub line_number: usize,
    #[source]
    pub error: io::Error,
}

/// Result of draining one stream
#[derive(Debug, Default)]
pub struct StreamSummary {
    /// Retained lines in arrival order
    pub transcript: Vec<String>,
    pub lines_read: usize,
    /// Lines that decoded as test events
    pub records: usize,
    pub parse_faults: Vec<ParseFault>,
    pub fault: Option<StreamFault>,
}

impl StreamSummary {
    /// Output of the child when it did not behave like a test run at all.
    ///
    /// That is the case when lines were received and none of them was a
    /// record. It usually carries an error from the tool itself, e.g.
    /// `package foo is not in std`. Lines such as `go: downloading ...` ahead
    /// of real records stay ordinary parse faults.
    pub fn invalid_invocation(&self) -> Option<String> {
        if self.records > 0 || self.parse_faults.is_empty() {
            return None;
        }

        let lines: Vec<&str> = self
            .parse_faults
            .iter()
            .map(|fault| fault.line.as_str())
            .collect();
        Some(lines.join("\n"))
    }
}

/// Single writer of the transcript; shares counters with the supervisor
pub struct StreamConsumer {
    format: LineFormat,
    stats: Arc<RunStatistics>,
    reporter: Arc<dyn Reporter>,
    summary: StreamSummary,
}

impl StreamConsumer {
    pub fn new(format: LineFormat, stats: Arc<RunStatistics>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            format,
            stats,
            reporter,
            summary: StreamSummary::default(),
        }
    }

    /// Read until end of stream or the first read error.
    ///
    /// The reader is dropped on return, so a writer still attached to the other
    /// end of a pipe gets a broken pipe instead of blocking forever.
    pub fn consume<R: Read>(mut self, reader: R) -> StreamSummary {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    self.summary.lines_read += 1;
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    self.handle_line(line);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    debug!("Stream read failed: {}", error);
                    self.summary.fault = Some(StreamFault {
                        line_number: self.summary.lines_read,
                        error,
                    });
                    break;
                }
            }
        }

        debug!(
            "Stream finished: {} line(s), {} record(s), {} parse fault(s)",
            self.summary.lines_read,
            self.summary.records,
            self.summary.parse_faults.len()
        );
        self.summary
    }

    fn handle_line(&mut self, line: &str) {
        match self.format {
            LineFormat::Plain => self.handle_output(line),
            LineFormat::Json => {
                if line.trim().is_empty() {
                    return;
                }
                match TestEvent::parse(line) {
                    Ok(event) => {
                        self.summary.records += 1;
                        trace!("{:?} {:?}", event.action, event.test);
                        if let Some(text) = event.output_text() {
                            self.handle_output(text);
                        }
                    }
                    Err(e) => {
                        debug!("Line {} is not a test event: {}", self.summary.lines_read, e);
                        self.summary.parse_faults.push(ParseFault {
                            line_number: self.summary.lines_read,
                            line: line.to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn handle_output(&mut self, text: &str) {
        let classification = classify(text);
        if !classification.is_retained() {
            return;
        }

        if let Some(status) = classification.status() {
            self.stats.record(status);
            self.reporter.on_tick(status);
        }

        self.summary.transcript.push(transcript_line(text));
    }
}
