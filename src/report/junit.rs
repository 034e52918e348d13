use crate::report::report_model::{TestStatus, TestSuiteReport};

// ============================================================================
// JUnit XML reporter for CI
// ============================================================================

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// Produces standard JUnit XML:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" skipped="1" time="1.234">
///   <testcase name="test_successful_login" classname="ui.login" time="0.812" />
///   <testcase name="test_login_with_invalid_credentials" classname="api.login" time="0.095">
///     <failure message="expected status 401 or 403, got 200" type="AssertionFailure">...</failure>
///   </testcase>
///   <testcase name="test_claimant_name_selection" classname="ui.claims" time="0.003">
///     <skipped message="no claimant fixture" />
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &TestSuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.test_results {
        let open = format!(
            "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
            escape_xml(&result.name),
            escape_xml(&result.suite),
            result.duration_ms as f64 / 1000.0
        );
        let message = result.message.as_deref().unwrap_or_default();

        match result.status {
            TestStatus::Passed => {
                cases.push_str(&open);
                cases.push_str(" />\n");
            }
            TestStatus::Skipped => {
                cases.push_str(&format!(
                    "{open}>\n    <skipped message=\"{message}\" />\n  </testcase>\n",
                    open = open,
                    message = escape_xml(message),
                ));
            }
            TestStatus::Failed => {
                // Failure body: message, then step log, then attachment paths
                let mut body_parts: Vec<String> = vec![message.to_string()];
                body_parts.extend(
                    result
                        .steps
                        .iter()
                        .enumerate()
                        .map(|(i, s)| format!("Step {}: {}", i + 1, s)),
                );
                body_parts.extend(
                    result
                        .attachments
                        .iter()
                        .map(|a| format!("Attachment {}: {}", a.name, a.path.display())),
                );
                let failure_message = if message.is_empty() {
                    "scenario failed"
                } else {
                    message
                };

                cases.push_str(&format!(
                    "{open}>\n    <failure message=\"{message}\" type=\"AssertionFailure\">{body}</failure>\n  </testcase>\n",
                    open = open,
                    message = escape_xml(failure_message),
                    body = escape_xml(&body_parts.join("\n")),
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" skipped=\"{skipped}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        skipped = report.skipped,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
