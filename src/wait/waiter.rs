use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace};

use crate::browser::driver::{Browser, DriverError, ElementRef};
use crate::browser::locator::Locator;
use crate::wait::conditions::{self, Condition};
use crate::wait::implicit::ImplicitWaitGuard;

/// Default upper bound for a wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default pause between two evaluations of a condition.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {}ms waiting for {condition}{}", .timeout.as_millis(), locator_suffix(.locator))]
    Timeout {
        condition: String,
        locator: Option<String>,
        timeout: Duration,
    },

    #[error("driver error while waiting for {condition}: {source}")]
    Driver {
        condition: String,
        #[source]
        source: DriverError,
    },
}

fn locator_suffix(locator: &Option<String>) -> String {
    locator
        .as_ref()
        .map(|l| format!(" [{}]", l))
        .unwrap_or_default()
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }
}

// ============================================================================
// Wait: timeout-bounded polling over a browser session
// ============================================================================

/// A blocking, timeout-bounded poll of one condition.
///
/// Holds no state between calls; build one per wait or reuse it freely.
#[derive(Clone, Copy)]
pub struct Wait<'a> {
    browser: &'a dyn Browser,
    timeout: Duration,
    poll_interval: Duration,
    ignore_missing: bool,
}

impl<'a> Wait<'a> {
    pub fn new(browser: &'a dyn Browser, timeout: Duration) -> Self {
        Wait {
            browser,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            ignore_missing: false,
        }
    }

    pub fn with_default_timeout(browser: &'a dyn Browser) -> Self {
        Self::new(browser, DEFAULT_TIMEOUT)
    }

    /// Wait with a custom poll interval that treats "no such element" as
    /// not yet satisfied, so checks may use strict lookups.
    pub fn fluent(browser: &'a dyn Browser, timeout: Duration, poll_interval: Duration) -> Self {
        Wait {
            browser,
            timeout,
            poll_interval,
            ignore_missing: true,
        }
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `check` until it yields a value or the timeout elapses.
    ///
    /// Stale element references are always retried. "No such element" is
    /// retried only by fluent waits. Any other driver error ends the wait.
    /// The session's implicit wait is off while polling, so the timeout
    /// alone bounds the wait.
    pub fn until<T>(
        &self,
        condition: &Condition,
        mut check: impl FnMut(&dyn Browser) -> Result<Option<T>, DriverError>,
    ) -> Result<T, WaitError> {
        let _implicit = ImplicitWaitGuard::suspend(self.browser);
        let start = Instant::now();
        let mut polls = 0u32;

        loop {
            polls += 1;
            match check(self.browser) {
                Ok(Some(value)) => {
                    debug!(
                        condition = %condition,
                        polls,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "wait satisfied"
                    );
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if e.is_stale() || (self.ignore_missing && e.is_missing()) => {
                    trace!(condition = %condition, error = %e, "transient error while polling");
                }
                Err(e) => {
                    return Err(WaitError::Driver {
                        condition: describe(condition),
                        source: e,
                    });
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(WaitError::Timeout {
                    condition: condition.to_string(),
                    locator: condition.locator().map(ToString::to_string),
                    timeout: self.timeout,
                });
            }
            std::thread::sleep(self.poll_interval.min(self.timeout - elapsed));
        }
    }

    // ---- Element conditions ----

    pub fn visible(&self, locator: &Locator) -> Result<ElementRef, WaitError> {
        self.until(&Condition::Visible(locator.clone()), |b| {
            conditions::visible(b, locator)
        })
    }

    pub fn clickable(&self, locator: &Locator) -> Result<ElementRef, WaitError> {
        self.until(&Condition::Clickable(locator.clone()), |b| {
            conditions::clickable(b, locator)
        })
    }

    pub fn present(&self, locator: &Locator) -> Result<ElementRef, WaitError> {
        self.until(&Condition::Present(locator.clone()), |b| {
            conditions::present(b, locator)
        })
    }

    pub fn all_visible(&self, locator: &Locator) -> Result<Vec<ElementRef>, WaitError> {
        self.until(&Condition::AllVisible(locator.clone()), |b| {
            conditions::all_visible(b, locator)
        })
    }

    pub fn invisible(&self, locator: &Locator) -> Result<(), WaitError> {
        self.until(&Condition::Invisible(locator.clone()), |b| {
            conditions::invisible(b, locator)
        })
    }

    pub fn text_contains(&self, locator: &Locator, text: &str) -> Result<ElementRef, WaitError> {
        let condition = Condition::TextContains {
            locator: locator.clone(),
            text: text.to_string(),
        };
        self.until(&condition, |b| conditions::text_contains(b, locator, text))
    }

    pub fn attribute_contains(
        &self,
        locator: &Locator,
        attribute: &str,
        value: &str,
    ) -> Result<ElementRef, WaitError> {
        let condition = Condition::AttributeContains {
            locator: locator.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        };
        self.until(&condition, |b| {
            conditions::attribute_contains(b, locator, attribute, value)
        })
    }

    // ---- Page conditions ----

    pub fn url_contains(&self, fragment: &str) -> Result<String, WaitError> {
        self.until(&Condition::UrlContains(fragment.to_string()), |b| {
            conditions::url_contains(b, fragment)
        })
    }

    pub fn title_contains(&self, fragment: &str) -> Result<String, WaitError> {
        self.until(&Condition::TitleContains(fragment.to_string()), |b| {
            conditions::title_contains(b, fragment)
        })
    }

    /// Wait for an arbitrary predicate over the session.
    pub fn for_predicate(
        &self,
        description: &str,
        mut predicate: impl FnMut(&dyn Browser) -> Result<bool, DriverError>,
    ) -> Result<(), WaitError> {
        self.until(&Condition::Custom(description.to_string()), |b| {
            Ok(predicate(b)?.then_some(()))
        })
    }

    /// Fluent element lookup: polls a strict `find_element`.
    pub fn element(&self, locator: &Locator) -> Result<ElementRef, WaitError> {
        self.until(&Condition::Present(locator.clone()), |b| {
            b.find_element(locator).map(Some)
        })
    }
}

fn describe(condition: &Condition) -> String {
    match condition.locator() {
        Some(l) => format!("{} [{}]", condition, l),
        None => condition.to_string(),
    }
}

/// Unconditional pause for screens that need a fixed settle time.
pub fn hard_wait(duration: Duration) {
    debug!(ms = duration.as_millis() as u64, "hard wait");
    std::thread::sleep(duration);
}
