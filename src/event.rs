// Test event records emitted by `go test -json`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle action carried by a test event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Start,
    Run,
    Pause,
    Cont,
    Pass,
    Bench,
    Fail,
    Output,
    Skip,
    BuildOutput,
    BuildFail,
    #[serde(other)]
    Unknown,
}

/// One line of `go test -json` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    pub action: Action,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub elapsed: Option<f64>,
}

impl TestEvent {
    /// Parse a single JSON line
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Output text, if this event carries any
    pub fn output_text(&self) -> Option<&str> {
        self.output.as_deref().filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_event() {
        let line = r#"{"Time":"2024-01-02T10:00:00.123456+09:00","Action":"output","Package":"example.com/foo","Test":"TestFoo","Output":"=== RUN   TestFoo\n"}"#;

        let event = TestEvent::parse(line).expect("valid event");

        assert_eq!(event.action, Action::Output);
        assert_eq!(event.package.as_deref(), Some("example.com/foo"));
        assert_eq!(event.test.as_deref(), Some("TestFoo"));
        assert_eq!(event.output_text(), Some("=== RUN   TestFoo\n"));
        assert!(event.time.is_some());
    }

    #[test]
    fn test_parse_pass_event_with_elapsed() {
        let line = r#"{"Action":"pass","Package":"example.com/foo","Test":"TestFoo","Elapsed":0.25}"#;

        let event = TestEvent::parse(line).expect("valid event");

        assert_eq!(event.action, Action::Pass);
        assert_eq!(event.elapsed, Some(0.25));
        assert!(event.output_text().is_none());
    }

    #[test]
    fn test_parse_unknown_action() {
        let event = TestEvent::parse(r#"{"Action":"attr"}"#).expect("valid event");
        assert_eq!(event.action, Action::Unknown);
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(TestEvent::parse("package foo is not in std").is_err());
    }
}
