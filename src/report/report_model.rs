use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::attachments::AttachmentRef;

// ============================================================================
// Per-scenario result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of a single scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Scenario name, e.g. `test_successful_login`
    pub name: String,

    /// Suite the scenario belongs to, e.g. `ui.login`
    pub suite: String,

    pub status: TestStatus,

    pub duration_ms: u128,

    /// Failure or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Step log in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,
}

impl TestResult {
    pub fn new(name: &str, suite: &str, status: TestStatus) -> Self {
        Self {
            name: name.to_string(),
            suite: suite.to_string(),
            status,
            duration_ms: 0,
            message: None,
            steps: Vec::new(),
            parameters: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// `suite::name`, used for filtering and display.
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

// ============================================================================
// Suite report: aggregate of TestResult entries
// ============================================================================

/// Aggregated report for a suite of scenario runs.
///
/// Built from a `Vec<TestResult>` via `from_results()`. Consumed by
/// console, HTML, JUnit and JSON reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteReport {
    /// Name of the test suite
    pub suite_name: String,

    /// Total number of tests
    pub total: usize,

    /// Number of passing tests
    pub passed: usize,

    /// Number of failing tests
    pub failed: usize,

    /// Number of skipped tests
    pub skipped: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Individual test results
    pub test_results: Vec<TestResult>,
}

impl TestSuiteReport {
    /// Build a suite report from a list of test results.
    ///
    /// Automatically computes total, passed, failed and skipped counts.
    pub fn from_results(suite_name: &str, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        let passed = count(TestStatus::Passed);
        let failed = count(TestStatus::Failed);
        let skipped = count(TestStatus::Skipped);
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed,
            failed,
            skipped,
            duration_ms: None,
            test_results: results,
        }
    }

    /// Set the total execution duration.
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether no test in the suite failed. Skips do not count as failures.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
