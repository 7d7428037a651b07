// Failure extractor - groups diagnostic output under the tests that failed

use crate::classify::{Classification, classify, is_package_trailer};

/// Indentation applied to diagnostic lines
const DIAGNOSTIC_INDENT: &str = "    ";

/// Failure lines of one top-level scope with the diagnostics written inside it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureGroup {
    /// `--- FAIL` lines, verbatim and in order
    pub failures: Vec<String>,
    /// Diagnostic lines, indented
    pub diagnostics: Vec<String>,
}

impl FailureGroup {
    /// Lines of the group in display order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.failures
            .iter()
            .chain(self.diagnostics.iter())
            .map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.diagnostics.is_empty()
    }
}

/// Walk state over a transcript
struct Extractor<'a> {
    transcript: &'a [String],
    classes: Vec<Classification>,
    scope_start: usize,
    last_fail: Option<usize>,
    last_scope: Option<String>,
    pending: FailureGroup,
    groups: Vec<FailureGroup>,
}

impl<'a> Extractor<'a> {
    fn new(transcript: &'a [String]) -> Self {
        Self {
            transcript,
            classes: transcript.iter().map(|line| classify(line)).collect(),
            scope_start: 0,
            last_fail: None,
            last_scope: None,
            pending: FailureGroup::default(),
            groups: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<FailureGroup> {
        for index in 0..self.transcript.len() {
            if let Some(marker) = self.classes[index].run_marker() {
                let continues_scope = self.last_scope.as_deref().is_some_and(|scope| {
                    marker
                        .test
                        .strip_prefix(scope)
                        .is_some_and(|rest| rest.starts_with('/'))
                });
                if continues_scope {
                    continue;
                }

                let scope = marker.top_level().to_string();
                self.close_scope(index);
                self.scope_start = index;
                self.last_scope = Some(scope);
            } else if self.classes[index] == Classification::Fail {
                self.pending.failures.push(self.transcript[index].clone());
                self.last_fail = Some(index);
            }
        }

        self.close_scope(self.transcript.len());
        self.groups
    }

    /// Close the scope starting at `scope_start`, ending before `end`.
    ///
    /// Output after the last `--- FAIL` line of the scope is kept up to the next
    /// marker, outcome or package trailer; later lines may come from another
    /// test running in parallel.
    fn close_scope(&mut self, end: usize) {
        if let Some(fail) = self.last_fail.filter(|&fail| self.scope_start < fail) {
            let tail_end = (fail + 1..end)
                .find(|&index| self.ends_tail(index))
                .unwrap_or(end);
            let diagnostics = (self.scope_start..tail_end)
                .filter(|&index| is_recordable(&self.transcript[index], &self.classes[index]))
                .map(|index| format!("{DIAGNOSTIC_INDENT}{}", self.transcript[index]));
            self.pending.diagnostics.extend(diagnostics);
        }

        let group = std::mem::take(&mut self.pending);
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    fn ends_tail(&self, index: usize) -> bool {
        self.classes[index].is_boundary() || is_package_trailer(&self.transcript[index])
    }
}

fn is_recordable(line: &str, class: &Classification) -> bool {
    class.is_diagnostic() && !line.trim().is_empty() && !is_package_trailer(line)
}

/// Group failure messages of a transcript by the scope that produced them.
///
/// A scope starts at a `=== RUN` line whose test is not a subtest of the
/// current scope, and lasts until the next such line. Subtest runs stay in the
/// scope of their top-level test, so their output is reported once. A scope
/// contributes its diagnostic lines only when a `--- FAIL` line was seen after
/// it started, from the scope start to the end of the output that directly
/// follows its last `--- FAIL` line.
pub fn extract_failures(transcript: &[String]) -> Vec<FailureGroup> {
    Extractor::new(transcript).run()
}

/// Flattened form of [`extract_failures`]
pub fn extract_failure_lines(transcript: &[String]) -> Vec<String> {
    extract_failures(transcript)
        .into_iter()
        .flat_map(|group| group.failures.into_iter().chain(group.diagnostics))
        .collect()
}
