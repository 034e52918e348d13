use std::path::Path;

use fnol_harness::runner::plan::{PlanError, SuitePlan};
use fnol_harness::scenarios;

mod common;

fn plan(yaml: &str) -> SuitePlan {
    serde_yaml::from_str(yaml).unwrap()
}

fn names(selected: &[fnol_harness::runner::Scenario]) -> Vec<String> {
    selected.iter().map(|s| s.full_name()).collect()
}

// ============================================================================
// 1. Parsing
// ============================================================================

#[test]
fn plan_defaults_to_sequential() {
    let p = plan("name: Smoke\nscenarios:\n  - ui.login\n");
    assert_eq!(p.name, "Smoke");
    assert!(!p.parallel);
    assert_eq!(p.threads, None);
    assert_eq!(p.workers(3), 1);
}

#[test]
fn parallel_plan_workers() {
    let p = plan("name: Regression\nparallel: true\nthreads: 5\nscenarios: [ui]\n");
    assert_eq!(p.workers(3), 5);

    let p = plan("name: Regression\nparallel: true\nscenarios: [ui]\n");
    assert_eq!(p.workers(3), 3);

    let p = plan("name: Zero\nparallel: true\nthreads: 0\nscenarios: [ui]\n");
    assert_eq!(p.workers(3), 1);
}

// ============================================================================
// 2. Selection against the catalog
// ============================================================================

#[test]
fn entries_match_prefix_full_name_and_bare_name() {
    let catalog = scenarios::all();
    let p = plan(
        "name: Mixed\nscenarios:\n  - api.login::test_api_login_response_time\n  - test_successful_login\n  - ui.inspect\n",
    );
    let selected = p.select(&catalog).unwrap();
    assert_eq!(
        names(&selected),
        vec![
            "api.login::test_api_login_response_time",
            "ui.login::test_successful_login",
            "ui.inspect::identify_page_elements",
        ]
    );
}

#[test]
fn selection_keeps_plan_order_without_duplicates() {
    let catalog = scenarios::all();
    let p = plan("name: Dup\nscenarios:\n  - ui.claims\n  - ui\n");
    let selected = p.select(&catalog).unwrap();

    let all_ui = catalog.iter().filter(|s| s.in_suite("ui")).count();
    assert_eq!(selected.len(), all_ui);
    assert!(selected[..4].iter().all(|s| s.suite == "ui.claims"));
    assert_eq!(selected[4].suite, "ui.login");
}

#[test]
fn prefix_does_not_match_partial_segment() {
    let catalog = scenarios::all();
    let p = plan("name: Partial\nscenarios:\n  - ui.log\n");
    assert!(matches!(p.select(&catalog), Err(PlanError::UnknownEntry { .. })));
}

#[test]
fn unknown_entry_names_plan_and_entry() {
    let catalog = scenarios::all();
    let p = plan("name: Broken\nscenarios:\n  - ui.payments\n");
    match p.select(&catalog) {
        Err(PlanError::UnknownEntry { plan, entry }) => {
            assert_eq!(plan, "Broken");
            assert_eq!(entry, "ui.payments");
        }
        other => panic!("expected UnknownEntry, got {:?}", other.map(|s| names(&s))),
    }
}

// ============================================================================
// 3. Loading from disk
// ============================================================================

#[test]
fn load_all_reads_directory_sorted_by_plan_name() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "a_smoke.yml", "name: Smoke\nscenarios: [api]\n");
    common::write_file(dir.path(), "b_regression.yaml", "name: Regression\nscenarios: [ui]\n");
    common::write_file(dir.path(), "notes.txt", "not a plan");

    let plans = SuitePlan::load_all(dir.path()).unwrap();
    let loaded: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(loaded, vec!["Regression", "Smoke"]);
}

#[test]
fn load_all_accepts_single_file() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "smoke.yaml", "name: Smoke\nscenarios: [api.login]\n");
    let plans = SuitePlan::load_all(&dir.path().join("smoke.yaml")).unwrap();
    assert_eq!(plans.len(), 1);
}

#[test]
fn load_errors_carry_path() {
    let err = SuitePlan::load(Path::new("suites/does-not-exist.yaml")).unwrap_err();
    assert!(matches!(err, PlanError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.yaml"));

    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "bad.yaml", "name: [unclosed\n");
    let err = SuitePlan::load(&dir.path().join("bad.yaml")).unwrap_err();
    assert!(matches!(err, PlanError::Parse { .. }));
}

#[test]
fn shipped_suite_plans_select_known_scenarios() {
    let catalog = scenarios::all();
    let plans = SuitePlan::load_all(Path::new("suites")).unwrap();
    assert!(!plans.is_empty());
    for p in plans {
        let selected = p.select(&catalog).unwrap();
        assert!(!selected.is_empty(), "plan {} selects nothing", p.name);
    }
}
