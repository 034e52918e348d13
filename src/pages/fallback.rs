use std::time::Duration;

use tracing::{debug, info};

use crate::browser::driver::{Browser, ElementRef};
use crate::browser::locator::{Locator, xpath_literal};
use crate::wait::{DEFAULT_POLL_INTERVAL, ImplicitWaitGuard, Wait};

/// Candidate XPath templates for an option inside the custom dropdown
/// widget, tried in order. `{id}` and `{label}` are replaced with XPath
/// string literals.
pub const OPTION_TEMPLATES: [&str; 4] = [
    "//select[contains(@id,{id})]//option[text()={label}]",
    "//*[@id={id}]//following-sibling::div//div[text()={label}]",
    "//*[@id={id}]//option[text()={label}]",
    "//div[contains(@class,'gw-popup')]//div[normalize-space(text())={label}]",
];

/// Per-candidate wait before moving on to the next template.
pub const CANDIDATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settle time between expanding the widget and looking for options.
pub const EXPAND_SETTLE: Duration = Duration::from_millis(500);

// ============================================================================
// OptionResolver: ordered multi-pattern lookup
// ============================================================================

/// Resolves a dropdown option by label using an ordered list of templates.
#[derive(Debug, Clone)]
pub struct OptionResolver {
    templates: Vec<String>,
    candidate_timeout: Duration,
    poll_interval: Duration,
    settle: Duration,
}

impl OptionResolver {
    pub fn new(templates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        OptionResolver {
            templates: templates.into_iter().map(Into::into).collect(),
            candidate_timeout: CANDIDATE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle: EXPAND_SETTLE,
        }
    }

    pub fn with_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.candidate_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Concrete locators for `widget_id` and `label`, in trial order.
    pub fn candidates(&self, widget_id: &str, label: &str) -> Vec<Locator> {
        let id = xpath_literal(widget_id);
        let label = xpath_literal(label);
        self.templates
            .iter()
            .map(|t| Locator::xpath(t.replace("{id}", &id).replace("{label}", &label)))
            .collect()
    }

    /// First candidate that becomes clickable within its own timeout.
    pub fn resolve(
        &self,
        browser: &dyn Browser,
        widget_id: &str,
        label: &str,
    ) -> Option<(Locator, ElementRef)> {
        let _implicit = ImplicitWaitGuard::suspend(browser);
        let wait = Wait::new(browser, self.candidate_timeout).poll_interval(self.poll_interval);

        for (index, candidate) in self.candidates(widget_id, label).into_iter().enumerate() {
            match wait.clickable(&candidate) {
                Ok(element) => {
                    info!(label, pattern = index + 1, locator = %candidate, "dropdown option resolved");
                    return Some((candidate, element));
                }
                Err(e) => debug!(label, pattern = index + 1, error = %e, "option pattern did not match"),
            }
        }
        None
    }
}

impl Default for OptionResolver {
    fn default() -> Self {
        OptionResolver::new(OPTION_TEMPLATES)
    }
}
