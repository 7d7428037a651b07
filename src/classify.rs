// Classifier - maps one line of test output to what it means for the run

use crate::state::TestStatus;

/// Kind of `===` marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Run,
    Pause,
    Cont,
    Name,
}

impl MarkerKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Run => "=== RUN",
            Self::Pause => "=== PAUSE",
            Self::Cont => "=== CONT",
            Self::Name => "=== NAME",
        }
    }
}

/// A `=== RUN` / `=== PAUSE` / `=== CONT` / `=== NAME` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Test name, possibly hierarchical (`Parent/Child`)
    pub test: String,
}

impl Marker {
    /// Top-level test this marker belongs to
    pub fn top_level(&self) -> &str {
        top_level_name(&self.test)
    }
}

/// Classification of a single output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Package summary (`ok`, `PASS`, `FAIL`, `[no test files]`); dropped
    Ignorable,
    Marker(Marker),
    Pass,
    Skip,
    Fail,
    /// Anything else, usually diagnostic output of a test
    Unclassified,
}

impl Classification {
    /// Counter mutation implied by this classification
    pub fn status(&self) -> Option<TestStatus> {
        match self {
            Self::Pass => Some(TestStatus::Pass),
            Self::Skip => Some(TestStatus::Skip),
            Self::Fail => Some(TestStatus::Fail),
            _ => None,
        }
    }

    /// Whether the line belongs in the transcript
    pub fn is_retained(&self) -> bool {
        !matches!(self, Self::Ignorable)
    }

    /// Whether the line can be shown as a diagnostic message of a failed test
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Unclassified)
    }

    /// Whether the line is a marker or an outcome, i.e. output from here on
    /// may belong to a different test
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Marker(_) | Self::Pass | Self::Skip | Self::Fail)
    }

    pub fn run_marker(&self) -> Option<&Marker> {
        match self {
            Self::Marker(marker) if marker.kind == MarkerKind::Run => Some(marker),
            _ => None,
        }
    }
}

const MARKER_KINDS: [MarkerKind; 4] = [
    MarkerKind::Run,
    MarkerKind::Cont,
    MarkerKind::Pause,
    MarkerKind::Name,
];

/// Classify one line of test output.
///
/// Summary lines are checked before markers and outcome lines; a package
/// summary such as `FAIL\texample.com/foo` must never count as a test.
pub fn classify(line: &str) -> Classification {
    let trimmed = line.trim();

    if trimmed.starts_with("ok")
        || trimmed.starts_with("FAIL")
        || trimmed.starts_with("PASS")
        || trimmed.contains("[no test files]")
    {
        return Classification::Ignorable;
    }

    for kind in MARKER_KINDS {
        if let Some(rest) = trimmed.strip_prefix(kind.prefix()) {
            return Classification::Marker(Marker {
                kind,
                test: rest.trim().to_string(),
            });
        }
    }

    if trimmed.starts_with("--- PASS") {
        Classification::Pass
    } else if trimmed.starts_with("--- SKIP") {
        Classification::Skip
    } else if trimmed.starts_with("--- FAIL") {
        Classification::Fail
    } else {
        Classification::Unclassified
    }
}

/// Form in which a retained line is stored in the transcript
pub fn transcript_line(line: &str) -> String {
    line.trim_end().to_string()
}

/// Package-level lines `go test` prints after the tests of a package, such as
/// `coverage: 50.0% of statements` or `exit status 1`
pub fn is_package_trailer(line: &str) -> bool {
    PACKAGE_TRAILERS
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

const PACKAGE_TRAILERS: [&str; 2] = ["coverage: ", "exit status "];

/// Part of a test name before the first `/`
pub fn top_level_name(test: &str) -> &str {
    match test.find('/') {
        Some(index) => &test[..index],
        None => test,
    }
}
