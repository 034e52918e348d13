use std::sync::Arc;
use std::time::Duration;

use fnol_harness::browser::capabilities::{BrowserKind, SessionPolicy};
use fnol_harness::browser::driver::DriverError;
use fnol_harness::browser::manager::{DriverManager, SessionLauncher};

mod common;
use common::fake_browser::FakeLauncher;

fn manager(launcher: &Arc<FakeLauncher>) -> DriverManager {
    let launcher: Arc<dyn SessionLauncher> = launcher.clone();
    DriverManager::new(launcher, SessionPolicy::default())
}

// ============================================================================
// 1. Initialize binds a configured session
// ============================================================================

#[test]
fn initialize_applies_session_policy() {
    let launcher = Arc::new(FakeLauncher::new());
    let mut driver = manager(&launcher);

    let session_id = driver.initialize("firefox", true).unwrap().session_id().to_string();
    assert_eq!(session_id, "fake-1");
    assert!(driver.is_initialized());

    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].0, BrowserKind::Firefox);
    assert!(launched[0].1);

    let session = &launched[0].2;
    assert_eq!(
        session.commands(),
        vec!["maximize", "timeouts", "delete cookies"]
    );
    assert_eq!(
        session.state().timeouts,
        Some((Duration::from_secs(10), Duration::from_secs(30)))
    );
}

#[test]
fn unknown_browser_launches_chrome() {
    let launcher = Arc::new(FakeLauncher::new());
    let mut driver = manager(&launcher);
    driver.initialize("safari", false).unwrap();
    assert_eq!(launcher.launched()[0].0, BrowserKind::Chrome);
}

// ============================================================================
// 2. Get before initialize
// ============================================================================

#[test]
fn get_without_session_is_not_initialized() {
    let launcher = Arc::new(FakeLauncher::new());
    let driver = manager(&launcher);
    assert!(matches!(driver.get(), Err(DriverError::NotInitialized)));
}

// ============================================================================
// 3. Re-initialize replaces the session
// ============================================================================

#[test]
fn reinitialize_quits_previous_session() {
    let launcher = Arc::new(FakeLauncher::new());
    let mut driver = manager(&launcher);
    driver.initialize("chrome", false).unwrap();
    driver.initialize("edge", false).unwrap();

    let sessions = launcher.sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].quit_calls(), 1);
    assert_eq!(sessions[1].quit_calls(), 0);
    assert_eq!(driver.get().unwrap().session_id(), "fake-2");
}

// ============================================================================
// 4. Teardown
// ============================================================================

#[test]
fn teardown_is_idempotent() {
    let launcher = Arc::new(FakeLauncher::new());
    let mut driver = manager(&launcher);
    driver.initialize("chrome", false).unwrap();

    driver.teardown();
    driver.teardown();
    assert!(!driver.is_initialized());
    assert_eq!(launcher.sessions()[0].quit_calls(), 1);
}

#[test]
fn teardown_swallows_quit_failure() {
    let launcher = Arc::new(FakeLauncher::with_setup(|b| b.state().fail_quit = true));
    let mut driver = manager(&launcher);
    driver.initialize("chrome", false).unwrap();

    driver.teardown();
    assert!(!driver.is_initialized());
    assert_eq!(launcher.sessions()[0].quit_calls(), 1);
}

#[test]
fn drop_tears_down_session() {
    let launcher = Arc::new(FakeLauncher::new());
    {
        let mut driver = manager(&launcher);
        driver.initialize("chrome", false).unwrap();
    }
    assert_eq!(launcher.sessions()[0].quit_calls(), 1);
}

// ============================================================================
// 5. Launch and policy failures
// ============================================================================

#[test]
fn launch_failure_leaves_manager_empty() {
    let launcher = Arc::new(FakeLauncher::failing());
    let mut driver = manager(&launcher);
    let err = driver.initialize("chrome", false).err().unwrap();
    assert!(matches!(err, DriverError::Launch { .. }));
    assert!(!driver.is_initialized());
}

#[test]
fn policy_failure_closes_new_session() {
    let launcher = Arc::new(FakeLauncher::with_setup(|b| b.state().fail_maximize = true));
    let mut driver = manager(&launcher);
    assert!(driver.initialize("chrome", false).is_err());
    assert!(!driver.is_initialized());
    assert_eq!(launcher.sessions()[0].quit_calls(), 1);
}

// ============================================================================
// 6. One manager per worker thread
// ============================================================================

#[test]
fn workers_get_distinct_sessions() {
    let launcher = Arc::new(FakeLauncher::new());
    let ids: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let launcher = launcher.clone();
                scope.spawn(move || {
                    let mut driver = manager(&launcher);
                    driver.initialize("chrome", true).unwrap().session_id().to_string()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3);
    assert!(launcher.sessions().iter().all(|s| s.quit_calls() == 1));
}
