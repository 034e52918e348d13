use std::path::PathBuf;
use std::time::Duration;

use fnol_harness::config::{Config, ConfigError};

mod common;

const SAMPLE: &str = "\
# Browser
browser=firefox
headless=true
environment=uat
base.url.qa=https://cc-qa.test/ClaimCenter.do
base.url.uat=https://cc-uat.test/ClaimCenter.do
api.base.url.uat=https://api-uat.test
explicit.wait=7
parallel.execution=true
thread.count=4
";

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load_from_reads_primary_file() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "resources/config.properties", SAMPLE);

    let config = Config::load_from(&dir.path().join("resources/config.properties")).unwrap();
    assert_eq!(config.browser(), "firefox");
    assert!(config.headless().unwrap());
}

#[test]
fn load_from_missing_file_lists_both_paths() {
    let missing = PathBuf::from("definitely/not/here/config.properties");
    match Config::load_from(&missing) {
        Err(ConfigError::NotFound { tried }) => {
            assert_eq!(tried.len(), 2);
            assert_eq!(tried[0], missing);
            assert_eq!(tried[1], PathBuf::from("config.properties"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

// ============================================================================
// Environment-keyed URLs
// ============================================================================

#[test]
fn base_urls_follow_environment() {
    let config = Config::parse(SAMPLE);
    assert_eq!(config.environment(), "uat");
    assert_eq!(config.base_url(), Some("https://cc-uat.test/ClaimCenter.do"));
    assert_eq!(config.api_base_url(), Some("https://api-uat.test"));

    let qa = config.with_overrides([("environment", "qa")]);
    assert_eq!(qa.base_url(), Some("https://cc-qa.test/ClaimCenter.do"));
    assert_eq!(qa.api_base_url(), None);
}

// ============================================================================
// Defaults and typed values
// ============================================================================

#[test]
fn absent_keys_use_defaults() {
    let config = Config::parse("");
    assert_eq!(config.browser(), "chrome");
    assert!(!config.headless().unwrap());
    assert_eq!(config.environment(), "qa");
    assert_eq!(config.implicit_wait().unwrap(), Duration::from_secs(10));
    assert_eq!(config.explicit_wait().unwrap(), Duration::from_secs(20));
    assert_eq!(config.page_load_timeout().unwrap(), Duration::from_secs(30));
    assert!(!config.parallel_execution().unwrap());
    assert_eq!(config.thread_count().unwrap(), 3);
    assert!(config.screenshot_on_failure().unwrap());
    assert_eq!(config.webdriver_url(), "http://localhost:9515");
    assert_eq!(config.base_url(), None);
}

#[test]
fn typed_values_are_parsed() {
    let config = Config::parse(SAMPLE);
    assert_eq!(config.explicit_wait().unwrap(), Duration::from_secs(7));
    assert!(config.parallel_execution().unwrap());
    assert_eq!(config.thread_count().unwrap(), 4);
}

#[test]
fn malformed_values_are_errors() {
    let config = Config::parse("headless=maybe\nexplicit.wait=soon");
    match config.headless() {
        Err(ConfigError::InvalidValue { key, value, .. }) => {
            assert_eq!(key, "headless");
            assert_eq!(value, "maybe");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
    assert!(config.explicit_wait().is_err());
}

#[test]
fn require_reports_missing_key() {
    let config = Config::parse("");
    match config.require("api.base.url.qa") {
        Err(ConfigError::Missing(key)) => assert_eq!(key, "api.base.url.qa"),
        other => panic!("expected Missing, got {:?}", other),
    }
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn overrides_leave_original_untouched() {
    let base = Config::parse(SAMPLE);
    let overridden = base.with_overrides([("browser", "edge"), ("thread.count", "2")]);
    assert_eq!(overridden.browser(), "edge");
    assert_eq!(overridden.thread_count().unwrap(), 2);
    assert_eq!(base.browser(), "firefox");
    assert_eq!(base.thread_count().unwrap(), 4);
}

#[test]
fn entries_are_sorted_by_key() {
    let config = Config::parse("b=2\na=1\nc=3");
    let keys: Vec<&str> = config.entries().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn shipped_properties_file_parses() {
    let content = std::fs::read_to_string("resources/config.properties").unwrap();
    let config = Config::parse(&content);
    assert_eq!(config.environment(), "qa");
    assert!(config.base_url().is_some());
    assert!(config.api_base_url().is_some());
    assert!(config.explicit_wait().is_ok());
    assert!(config.thread_count().is_ok());
}
