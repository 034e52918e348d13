use std::fmt::Write;

use crate::report::attachments::{AttachmentRef, MimeType};
use crate::report::report_model::{TestResult, TestStatus, TestSuiteReport};

// ============================================================================
// HTML reporter: one self-contained page per run
// ============================================================================

const STYLE: &str = r#"
body { font-family: "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #eef1f4; color: #222; }
header { padding: 18px 28px; color: #fff; }
header.ok { background: #2e7d32; }
header.broken { background: #c62828; }
header h1 { margin: 0 0 6px 0; font-size: 22px; }
header p { margin: 0; font-size: 15px; }
main { max-width: 960px; margin: 18px auto; padding: 0 18px; }
section.suite h2 { font-size: 17px; border-bottom: 1px solid #c5ccd3; padding-bottom: 4px; }
.test-case { background: #fff; padding: 12px 18px; margin: 0 0 10px 0; border-left: 5px solid #9e9e9e; }
.test-case.pass { border-left-color: #2e7d32; }
.test-case.fail { border-left-color: #c62828; }
.test-case.skip { border-left-color: #ef6c00; }
.test-case h3 { margin: 0 0 6px 0; font-size: 15px; }
.test-case .meta { color: #5f6b76; font-size: 13px; margin: 2px 0; }
.test-case .reason { font-weight: bold; margin: 6px 0; }
.test-case.fail .reason { color: #c62828; }
.test-case.skip .reason { color: #ef6c00; }
.steps, .attachments { margin: 6px 0 0 0; padding-left: 22px; font-size: 13px; }
.attachments img { display: block; max-width: 100%; margin: 4px 0; border: 1px solid #cfd8dc; }
"#;

/// Render `report` as a single HTML page with inline CSS.
///
/// Scenarios are grouped under their suite in report order. Each case
/// shows its parameters, reason, step log and attachments; PNG
/// attachments are shown inline.
pub fn generate_html_report(report: &TestSuiteReport) -> String {
    let (banner_class, headline) = if report.all_passed() {
        ("ok", "ALL TESTS PASSED")
    } else {
        ("broken", "SOME TESTS FAILED")
    };
    let duration = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut body = String::new();
    let mut current_suite: Option<&str> = None;
    for result in &report.test_results {
        if current_suite != Some(result.suite.as_str()) {
            if current_suite.is_some() {
                body.push_str("</section>\n");
            }
            let _ = writeln!(
                body,
                "<section class=\"suite\">\n<h2>{}</h2>",
                escape_html(&result.suite)
            );
            current_suite = Some(result.suite.as_str());
        }
        render_case(&mut body, result);
    }
    if current_suite.is_some() {
        body.push_str("</section>\n");
    }

    let suite_name = escape_html(&report.suite_name);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{suite_name} - FNOL Harness Report</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header class=\"{banner_class}\">\n<h1>{headline}</h1>\n\
         <p>{suite_name}: {passed} passed, {failed} failed, {skipped} skipped ({total} total){duration}</p>\n\
         </header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        total = report.total,
    )
}

fn render_case(out: &mut String, result: &TestResult) {
    let (class, marker) = match result.status {
        TestStatus::Passed => ("pass", "\u{2713}"),
        TestStatus::Failed => ("fail", "\u{2717}"),
        TestStatus::Skipped => ("skip", "\u{2298}"),
    };

    let _ = writeln!(
        out,
        "<div class=\"test-case {class}\">\n<h3>{marker} {name}</h3>\n\
         <p class=\"meta\">{steps} steps, {duration}ms</p>",
        name = escape_html(&result.name),
        steps = result.steps.len(),
        duration = result.duration_ms,
    );

    if !result.parameters.is_empty() {
        let params: Vec<String> = result
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", escape_html(k), escape_html(v)))
            .collect();
        let _ = writeln!(out, "<p class=\"meta\">Parameters: {}</p>", params.join(", "));
    }

    if let Some(message) = &result.message {
        let label = if result.status == TestStatus::Skipped {
            "Skipped"
        } else {
            "Error"
        };
        let _ = writeln!(out, "<p class=\"reason\">{}: {}</p>", label, escape_html(message));
    }

    if !result.steps.is_empty() {
        out.push_str("<ol class=\"steps\">\n");
        for step in &result.steps {
            let _ = writeln!(out, "<li>{}</li>", escape_html(step));
        }
        out.push_str("</ol>\n");
    }

    if !result.attachments.is_empty() {
        out.push_str("<ul class=\"attachments\">\n");
        for attachment in &result.attachments {
            render_attachment(out, attachment);
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</div>\n");
}

fn render_attachment(out: &mut String, attachment: &AttachmentRef) {
    let path = escape_html(&attachment.path.display().to_string());
    let name = escape_html(&attachment.name);
    let _ = match attachment.mime {
        MimeType::Png => writeln!(
            out,
            "<li><a href=\"{path}\">{name}</a><img src=\"{path}\" alt=\"{name}\"></li>"
        ),
        other => writeln!(
            out,
            "<li><a href=\"{path}\">{name}</a> ({})</li>",
            other.as_str()
        ),
    };
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
