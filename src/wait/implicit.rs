use std::time::Duration;

use tracing::{trace, warn};

use crate::browser::driver::Browser;

/// Turns the session's implicit wait off for the lifetime of the guard and
/// puts the previous value back on drop.
///
/// Explicit waits poll with `find_elements`; with an implicit wait in force
/// every empty lookup would block for the full implicit timeout. Nested
/// guards are free: a session already at zero is left alone.
pub struct ImplicitWaitGuard<'a> {
    browser: &'a dyn Browser,
    saved: Option<Duration>,
}

impl<'a> ImplicitWaitGuard<'a> {
    pub fn suspend(browser: &'a dyn Browser) -> Self {
        let current = browser.implicit_wait();
        if current.is_zero() {
            return ImplicitWaitGuard { browser, saved: None };
        }

        match browser.set_implicit_wait(Duration::ZERO) {
            Ok(()) => {
                trace!(implicit_ms = current.as_millis() as u64, "implicit wait suspended");
                ImplicitWaitGuard {
                    browser,
                    saved: Some(current),
                }
            }
            Err(e) => {
                warn!(error = %e, "could not suspend implicit wait");
                ImplicitWaitGuard { browser, saved: None }
            }
        }
    }
}

impl Drop for ImplicitWaitGuard<'_> {
    fn drop(&mut self) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        if let Err(e) = self.browser.set_implicit_wait(saved) {
            warn!(error = %e, implicit_ms = saved.as_millis() as u64, "could not restore implicit wait");
        }
    }
}
