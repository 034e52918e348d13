use std::cell::Cell;
use std::time::{Duration, Instant};

use fnol_harness::browser::driver::{Browser, DriverError};
use fnol_harness::browser::locator::Locator;
use fnol_harness::wait::{Condition, RetryError, RetryPolicy, Wait, WaitError};

mod common;
use common::fake_browser::FakeBrowser;

const SHORT: Duration = Duration::from_millis(200);
const POLL: Duration = Duration::from_millis(10);

fn wait(browser: &FakeBrowser) -> Wait<'_> {
    Wait::new(browser, SHORT).poll_interval(POLL)
}

// ============================================================================
// 1. Element conditions
// ============================================================================

#[test]
fn visible_returns_displayed_element() {
    let browser = FakeBrowser::new("s");
    let id = browser.add(Locator::id("user-name"), "");
    let start = Instant::now();
    let found = wait(&browser).visible(&Locator::id("user-name")).unwrap();
    assert!(start.elapsed() < POLL, "visible element should not wait a poll interval");
    assert_eq!(found.id(), id);
}

#[test]
fn clickable_requires_enabled() {
    let browser = FakeBrowser::new("s");
    let id = browser.add(Locator::id("login-button"), "Login");
    browser.update(&id, |el| el.enabled = false);

    let err = wait(&browser).clickable(&Locator::id("login-button")).unwrap_err();
    assert!(err.is_timeout());

    browser.update(&id, |el| el.enabled = true);
    assert!(wait(&browser).clickable(&Locator::id("login-button")).is_ok());
}

#[test]
fn present_ignores_visibility() {
    let browser = FakeBrowser::new("s");
    let id = browser.add(Locator::css("input[type=hidden]"), "");
    browser.update(&id, |el| el.displayed = false);
    assert!(wait(&browser).present(&Locator::css("input[type=hidden]")).is_ok());
    assert!(wait(&browser).visible(&Locator::css("input[type=hidden]")).is_err());
}

#[test]
fn all_visible_needs_every_match_displayed() {
    let browser = FakeBrowser::new("s");
    let rows = Locator::css(".row");
    browser.add(rows.clone(), "a");
    let hidden = browser.add(rows.clone(), "b");
    browser.update(&hidden, |el| el.displayed = false);
    assert!(wait(&browser).all_visible(&rows).is_err());

    browser.update(&hidden, |el| el.displayed = true);
    assert_eq!(wait(&browser).all_visible(&rows).unwrap().len(), 2);
}

#[test]
fn invisible_is_satisfied_by_absence() {
    let browser = FakeBrowser::new("s");
    assert!(wait(&browser).invisible(&Locator::id("gw-click-overlay")).is_ok());

    browser.add(Locator::id("gw-click-overlay"), "");
    assert!(wait(&browser).invisible(&Locator::id("gw-click-overlay")).is_err());
}

#[test]
fn text_and_attribute_conditions() {
    let browser = FakeBrowser::new("s");
    let id = browser.add(Locator::css(".status"), "Claim saved");
    browser.update(&id, |el| {
        el.attributes.insert("aria-disabled".into(), "false".into());
    });

    assert!(wait(&browser).text_contains(&Locator::css(".status"), "saved").is_ok());
    assert!(wait(&browser).text_contains(&Locator::css(".status"), "failed").is_err());
    assert!(
        wait(&browser)
            .attribute_contains(&Locator::css(".status"), "aria-disabled", "false")
            .is_ok()
    );
}

// ============================================================================
// 2. Page conditions
// ============================================================================

#[test]
fn url_and_title_conditions() {
    let browser = FakeBrowser::new("s");
    browser.set_url("https://cc.test/ClaimCenter.do?dashboard");
    browser.set_title("Guidewire ClaimCenter");

    assert_eq!(
        wait(&browser).url_contains("dashboard").unwrap(),
        "https://cc.test/ClaimCenter.do?dashboard"
    );
    assert!(wait(&browser).title_contains("ClaimCenter").is_ok());
    assert!(wait(&browser).title_contains("PolicyCenter").is_err());
}

#[test]
fn predicate_wait_sees_later_change() {
    let browser = FakeBrowser::new("s");
    let handle = browser.clone();
    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(40));
        handle.set_url("https://cc.test/home");
    });

    let result = Wait::new(&browser, Duration::from_secs(2))
        .poll_interval(POLL)
        .for_predicate("url contains home", |b| Ok(b.current_url()?.contains("home")));
    writer.join().unwrap();
    assert!(result.is_ok());
}

// ============================================================================
// 3. Timeout and error handling
// ============================================================================

#[test]
fn timeout_error_names_condition_and_locator() {
    let browser = FakeBrowser::new("s");
    let start = Instant::now();
    let err = wait(&browser).visible(&Locator::id("missing")).unwrap_err();
    let elapsed = start.elapsed();
    assert!(elapsed >= SHORT);
    assert!(elapsed < SHORT + 2 * POLL, "wait overran its timeout: {:?}", elapsed);
    assert!(err.is_timeout());

    let message = err.to_string();
    assert!(message.contains("timed out after 200ms"));
    assert!(message.contains("element to be visible"));
    assert!(message.contains("[id=missing]"));
}

#[test]
fn stale_errors_are_retried() {
    let browser = FakeBrowser::new("s");
    let calls = Cell::new(0);
    let value = wait(&browser)
        .until(&Condition::Custom("settles".into()), |_| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(DriverError::StaleElement("el-1".into()))
            } else {
                Ok(Some(42))
            }
        })
        .unwrap();
    assert_eq!(value, 42);
    assert_eq!(calls.get(), 3);
}

#[test]
fn other_driver_errors_end_the_wait() {
    let browser = FakeBrowser::new("s");
    let calls = Cell::new(0);
    let err = wait(&browser)
        .until::<()>(&Condition::Custom("boom".into()), |_| {
            calls.set(calls.get() + 1);
            Err(DriverError::NotInitialized)
        })
        .unwrap_err();
    assert!(matches!(err, WaitError::Driver { .. }));
    assert_eq!(calls.get(), 1);
}

#[test]
fn missing_element_ends_plain_wait_but_not_fluent() {
    let browser = FakeBrowser::new("s");
    let strict = wait(&browser)
        .until(&Condition::Present(Locator::id("late")), |b| {
            b.find_element(&Locator::id("late")).map(Some)
        })
        .unwrap_err();
    assert!(matches!(strict, WaitError::Driver { .. }));

    let handle = browser.clone();
    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(40));
        handle.add(Locator::id("late"), "");
    });
    let fluent = Wait::fluent(&browser, Duration::from_secs(2), POLL).element(&Locator::id("late"));
    writer.join().unwrap();
    assert!(fluent.is_ok());
}

// ============================================================================
// 4. Implicit wait
// ============================================================================

#[test]
fn fake_lookup_blocks_for_implicit_wait() {
    let browser = FakeBrowser::new("s");
    browser.set_implicit_wait(Duration::from_millis(150)).unwrap();
    let start = Instant::now();
    assert!(browser.find_elements(&Locator::id("missing")).unwrap().is_empty());
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[test]
fn explicit_wait_is_bounded_by_its_own_timeout() {
    let browser = FakeBrowser::new("s");
    browser.set_implicit_wait(Duration::from_secs(2)).unwrap();

    let start = Instant::now();
    let err = Wait::new(&browser, Duration::from_millis(300))
        .poll_interval(POLL)
        .visible(&Locator::id("missing"))
        .unwrap_err();
    let elapsed = start.elapsed();
    assert!(err.is_timeout());
    assert!(elapsed < Duration::from_secs(1), "implicit wait leaked into polling: {:?}", elapsed);

    assert_eq!(browser.implicit_wait(), Duration::from_secs(2));
    assert_eq!(
        browser.commands(),
        vec!["implicit 2000ms", "implicit 0ms", "implicit 2000ms"]
    );
}

#[test]
fn implicit_wait_is_restored_after_success() {
    let browser = FakeBrowser::new("s");
    browser.add(Locator::id("user-name"), "");
    browser.set_implicit_wait(Duration::from_secs(2)).unwrap();

    assert!(wait(&browser).visible(&Locator::id("user-name")).is_ok());
    assert_eq!(browser.implicit_wait(), Duration::from_secs(2));
}

#[test]
fn zero_implicit_wait_sends_no_timeout_commands() {
    let browser = FakeBrowser::new("s");
    assert!(wait(&browser).invisible(&Locator::id("gw-click-overlay")).is_ok());
    assert!(browser.commands().is_empty());
}

// ============================================================================
// 5. Retry policy
// ============================================================================

#[test]
fn retry_gives_up_after_max_attempts() {
    let policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
    };
    let mut seen = Vec::new();
    let result: Result<(), _> = policy.run(DriverError::is_stale, |attempt| {
        seen.push(attempt);
        Err(DriverError::StaleElement("btn".into()))
    });
    match result {
        Err(RetryError::Exhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(last.is_stale());
        }
        other => panic!("expected Exhausted, got {:?}", other),
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn retry_does_not_repeat_fatal_errors() {
    let mut attempts = 0;
    let result: Result<(), _> = RetryPolicy::CLICK.run(DriverError::is_stale, |_| {
        attempts += 1;
        Err(DriverError::NoSuchElement("btn".into()))
    });
    assert!(matches!(result, Err(RetryError::Fatal(_))));
    assert_eq!(attempts, 1);
}

#[test]
fn retry_recovers_after_transient_failure() {
    let policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
    };
    let result = policy.run(DriverError::is_stale, |attempt| {
        if attempt == 1 {
            Err(DriverError::StaleElement("btn".into()))
        } else {
            Ok(attempt)
        }
    });
    assert_eq!(result.unwrap(), 2);
}
