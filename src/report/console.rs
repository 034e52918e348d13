use crate::report::report_model::{TestStatus, TestSuiteReport};

// ============================================================================
// Console reporter: terminal summary
// ============================================================================

/// Format a test suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Suite: fnol-harness ===
///
/// ✓ PASS  ui.login::test_successful_login (4 steps, 812ms)
/// ✗ FAIL  api.login::test_login_with_invalid_credentials (2 steps, 95ms)
///     [FAIL] expected status 401 or 403, got 200
///     [ATTACHMENT] Response: target/test-results/attachments/3f2a...json
/// ⊘ SKIP  ui.claims::test_claimant_name_selection (0 steps, 3ms)
///     [SKIP] no claimant fixture
///
/// === Results: 1 passed, 1 failed, 1 skipped (3 total) ===
/// ```
pub fn format_console_report(report: &TestSuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Suite: {} ===\n\n", report.suite_name));

    for result in &report.test_results {
        let marker = match result.status {
            TestStatus::Passed => "\u{2713} PASS",
            TestStatus::Failed => "\u{2717} FAIL",
            TestStatus::Skipped => "\u{2298} SKIP",
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {}ms)\n",
            marker,
            result.full_name(),
            result.steps.len(),
            result.duration_ms
        ));

        if let Some(ref message) = result.message {
            let tag = match result.status {
                TestStatus::Skipped => "SKIP",
                _ => "FAIL",
            };
            out.push_str(&format!("    [{}] {}\n", tag, message));
        }

        if result.status == TestStatus::Failed {
            for attachment in &result.attachments {
                out.push_str(&format!(
                    "    [ATTACHMENT] {}: {}\n",
                    attachment.name,
                    attachment.path.display()
                ));
            }
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} skipped ({} total)",
        report.passed, report.failed, report.skipped, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
