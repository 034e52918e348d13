use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::HarnessError;
use crate::report::report_model::TestSuiteReport;
use crate::runner::context::ScenarioContext;
use crate::runner::scenario::Scenario;

/// Lifecycle hooks invoked by the runner. All hooks default to no-ops.
///
/// Listeners are shared by every worker, so they must be `Send + Sync`.
pub trait TestListener: Send + Sync {
    fn on_suite_start(&self, _suite: &str, _total: usize) {}

    fn on_suite_finish(&self, _report: &TestSuiteReport) {}

    fn on_test_start(&self, _scenario: &Scenario) {}

    fn on_test_success(&self, _scenario: &Scenario, _elapsed: Duration) {}

    /// Called before teardown, while the failing session is still bound.
    fn on_test_failure(&self, _scenario: &Scenario, _ctx: &ScenarioContext, _error: &HarnessError) {}

    fn on_test_skipped(&self, _scenario: &Scenario, _reason: &str) {}

    /// Called when no context could be built for the scenario, so there is
    /// no session to inspect.
    fn on_setup_failure(&self, _scenario: &Scenario, _error: &HarnessError) {}
}

// ============================================================================
// LoggingListener: lifecycle logging + screenshot on failure
// ============================================================================

pub struct LoggingListener {
    screenshot_on_failure: bool,
}

impl LoggingListener {
    pub fn new(screenshot_on_failure: bool) -> Self {
        LoggingListener {
            screenshot_on_failure,
        }
    }
}

impl TestListener for LoggingListener {
    fn on_suite_start(&self, suite: &str, total: usize) {
        info!(suite, total, "test suite started");
    }

    fn on_suite_finish(&self, report: &TestSuiteReport) {
        info!(
            suite = %report.suite_name,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            "test suite finished"
        );
    }

    fn on_test_start(&self, scenario: &Scenario) {
        info!(scenario = %scenario.full_name(), "test started");
    }

    fn on_test_success(&self, scenario: &Scenario, elapsed: Duration) {
        info!(
            scenario = %scenario.full_name(),
            duration_ms = elapsed.as_millis() as u64,
            "\u{2713} test passed"
        );
    }

    fn on_test_failure(&self, scenario: &Scenario, ctx: &ScenarioContext, err: &HarnessError) {
        error!(scenario = %scenario.full_name(), error = %err, "\u{2717} test failed");

        if self.screenshot_on_failure && ctx.driver().is_initialized() {
            let label = format!("{}.{}", scenario.suite, scenario.name);
            if let Err(e) = ctx.capture_screenshot(&label) {
                error!(scenario = %scenario.full_name(), error = %e, "failed to capture screenshot");
            }
        }
    }

    fn on_test_skipped(&self, scenario: &Scenario, reason: &str) {
        warn!(scenario = %scenario.full_name(), reason, "\u{2298} test skipped");
    }

    fn on_setup_failure(&self, scenario: &Scenario, err: &HarnessError) {
        error!(scenario = %scenario.full_name(), error = %err, "\u{2717} test setup failed");
    }
}
