// Tests for failure extraction - grouping and de-duplication

use hottest::extract::{FailureGroup, extract_failure_lines, extract_failures};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_failure_followed_by_passing_test() {
    // Arrange
    let transcript = lines(&[
        "=== RUN A",
        "--- FAIL: A (0.01s)",
        "some diagnostic",
        "=== RUN B",
        "--- PASS: B (0.00s)",
    ]);

    // Act
    let groups = extract_failures(&transcript);

    // Assert
    assert_eq!(
        groups,
        vec![FailureGroup {
            failures: lines(&["--- FAIL: A (0.01s)"]),
            diagnostics: lines(&["    some diagnostic"]),
        }]
    );
}

#[test]
fn test_nested_failure_is_not_duplicated() {
    // Arrange
    let transcript = lines(&[
        "=== RUN Parent",
        "=== RUN Parent/Child",
        "--- FAIL: Parent/Child (0.00s)",
        "--- FAIL: Parent (0.00s)",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(
        flat,
        lines(&["--- FAIL: Parent/Child (0.00s)", "--- FAIL: Parent (0.00s)"])
    );
}

#[test]
fn test_nested_diagnostics_reported_once() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestParent",
        "    parent_test.go:10: setup done",
        "=== RUN   TestParent/Child",
        "    parent_test.go:20: child broke",
        "    --- FAIL: TestParent/Child (0.00s)",
        "--- FAIL: TestParent (0.00s)",
        "=== RUN   TestOther",
        "--- PASS: TestOther (0.00s)",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(
        flat,
        lines(&[
            "    --- FAIL: TestParent/Child (0.00s)",
            "--- FAIL: TestParent (0.00s)",
            "        parent_test.go:10: setup done",
            "        parent_test.go:20: child broke",
        ])
    );
    let child_lines = flat.iter().filter(|l| l.contains("child broke")).count();
    assert_eq!(child_lines, 1);
}

#[test]
fn test_three_nested_levels_form_one_group() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestTop",
        "=== RUN   TestTop/Mid",
        "=== RUN   TestTop/Mid/Leaf",
        "    leaf_test.go:5: leaf broke",
        "        --- FAIL: TestTop/Mid/Leaf (0.00s)",
        "    --- FAIL: TestTop/Mid (0.00s)",
        "--- FAIL: TestTop (0.00s)",
    ]);

    // Act
    let groups = extract_failures(&transcript);

    // Assert
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].failures,
        lines(&[
            "        --- FAIL: TestTop/Mid/Leaf (0.00s)",
            "    --- FAIL: TestTop/Mid (0.00s)",
            "--- FAIL: TestTop (0.00s)",
        ])
    );
    assert_eq!(groups[0].diagnostics, lines(&["        leaf_test.go:5: leaf broke"]));
}

#[test]
fn test_sibling_subtests_stay_in_parent_scope() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestTable",
        "=== RUN   TestTable/first",
        "    table_test.go:8: first broke",
        "=== RUN   TestTable/second",
        "    table_test.go:8: second broke",
        "    --- FAIL: TestTable/first (0.00s)",
        "    --- FAIL: TestTable/second (0.00s)",
        "--- FAIL: TestTable (0.00s)",
    ]);

    // Act
    let groups = extract_failures(&transcript);

    // Assert
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].failures.len(), 3);
    assert_eq!(
        groups[0].diagnostics,
        lines(&[
            "        table_test.go:8: first broke",
            "        table_test.go:8: second broke",
        ])
    );
}

#[test]
fn test_no_failures_means_no_output() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "    a_test.go:1: just logging",
        "--- PASS: TestA (0.00s)",
        "=== RUN   TestB",
        "--- SKIP: TestB (0.00s)",
        "    b_test.go:2: skipped on this platform",
    ]);

    // Act & Assert
    assert!(extract_failures(&transcript).is_empty());
    assert!(extract_failure_lines(&transcript).is_empty());
}

#[test]
fn test_empty_transcript() {
    assert!(extract_failures(&[]).is_empty());
}

#[test]
fn test_whitespace_lines_are_never_recorded() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "   ",
        "",
        "\t",
        "    a_test.go:3: boom",
        "--- FAIL: TestA (0.00s)",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(flat, lines(&["--- FAIL: TestA (0.00s)", "        a_test.go:3: boom"]));
    assert!(flat.iter().all(|line| !line.trim().is_empty()));
}

#[test]
fn test_markers_are_not_diagnostics() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "=== PAUSE TestA",
        "=== CONT  TestA",
        "=== NAME  TestA",
        "    a_test.go:3: boom",
        "--- FAIL: TestA (0.00s)",
    ]);

    // Act
    let groups = extract_failures(&transcript);

    // Assert
    assert_eq!(groups[0].diagnostics, lines(&["        a_test.go:3: boom"]));
}

#[test]
fn test_trailing_output_after_failure_is_captured() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestPanics",
        "--- FAIL: TestPanics (0.00s)",
        "panic: runtime error: index out of range [recovered]",
        "goroutine 7 [running]:",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(
        flat,
        lines(&[
            "--- FAIL: TestPanics (0.00s)",
            "    panic: runtime error: index out of range [recovered]",
            "    goroutine 7 [running]:",
        ])
    );
}

#[test]
fn test_extraction_is_idempotent() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "    a: one",
        "--- FAIL: TestA (0.00s)",
        "=== RUN   TestB",
        "=== RUN   TestB/x",
        "    b: two",
        "    --- FAIL: TestB/x (0.00s)",
        "--- FAIL: TestB (0.00s)",
    ]);

    // Act
    let first = extract_failures(&transcript);
    let second = extract_failures(&transcript);

    // Assert
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_group_lines_put_failures_first() {
    // Arrange
    let group = FailureGroup {
        failures: lines(&["--- FAIL: TestA (0.00s)"]),
        diagnostics: lines(&["    a: one"]),
    };

    // Act
    let rendered: Vec<&str> = group.lines().collect();

    // Assert
    assert_eq!(rendered, vec!["--- FAIL: TestA (0.00s)", "    a: one"]);
}

#[test]
fn test_parallel_passing_output_is_not_attributed_to_failure() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "=== PAUSE TestA",
        "=== RUN   TestB",
        "=== PAUSE TestB",
        "=== CONT  TestA",
        "    a_test.go:3: boom",
        "--- FAIL: TestA (0.00s)",
        "=== CONT  TestB",
        "    b_test.go:9: all good here",
        "--- PASS: TestB (0.00s)",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(
        flat,
        lines(&["--- FAIL: TestA (0.00s)", "        a_test.go:3: boom"])
    );
}

#[test]
fn test_output_after_failure_stops_at_next_outcome() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "--- FAIL: TestA (0.00s)",
        "    a_test.go:7: cleanup failed",
        "--- PASS: TestA/late (0.00s)",
        "    unrelated line",
    ]);

    // Act
    let groups = extract_failures(&transcript);

    // Assert
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].diagnostics, lines(&["        a_test.go:7: cleanup failed"]));
}

#[test]
fn test_cover_trailer_is_not_a_diagnostic() {
    // Arrange
    let transcript = lines(&[
        "=== RUN   TestA",
        "    a_test.go:3: boom",
        "--- FAIL: TestA (0.00s)",
        "coverage: 50.0% of statements",
        "exit status 1",
    ]);

    // Act
    let flat = extract_failure_lines(&transcript);

    // Assert
    assert_eq!(
        flat,
        lines(&["--- FAIL: TestA (0.00s)", "        a_test.go:3: boom"])
    );
}
