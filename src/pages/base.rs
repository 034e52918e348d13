use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::browser::driver::{Browser, DriverError, ElementRef, element_arg};
use crate::browser::locator::{Locator, xpath_literal};
use crate::pages::fallback::OptionResolver;
use crate::wait::{
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, ImplicitWaitGuard, RetryError, RetryPolicy, Wait, WaitError, hard_wait,
};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{action} failed for {locator}: {source}")]
    Wait {
        action: &'static str,
        locator: String,
        #[source]
        source: WaitError,
    },

    #[error("{action} failed for {locator}: {source}")]
    Driver {
        action: &'static str,
        locator: String,
        #[source]
        source: DriverError,
    },

    #[error("click failed for {locator} after {attempts} attempts: {source}")]
    ClickFailed {
        locator: String,
        attempts: u32,
        #[source]
        source: Box<PageError>,
    },

    #[error("could not find option '{label}' in dropdown {locator}")]
    OptionNotFound { label: String, locator: String },

    #[error("option index {index} out of range for {locator} ({available} options)")]
    OptionIndexOutOfRange {
        index: usize,
        available: usize,
        locator: String,
    },
}

impl PageError {
    pub fn is_stale(&self) -> bool {
        matches!(self, PageError::Driver { source, .. } if source.is_stale())
    }
}

fn wait_err(action: &'static str, locator: &Locator) -> impl FnOnce(WaitError) -> PageError {
    let locator = locator.to_string();
    move |source| PageError::Wait {
        action,
        locator,
        source,
    }
}

fn driver_err(action: &'static str, locator: &Locator) -> impl FnOnce(DriverError) -> PageError {
    let locator = locator.to_string();
    move |source| PageError::Driver {
        action,
        locator,
        source,
    }
}

// ============================================================================
// Page: business-level primitives over one browser session
// ============================================================================

/// Element actions shared by every page object.
///
/// Bound explicitly to the worker's session. Every lookup goes through an
/// explicit wait; clicks retry on stale references.
#[derive(Clone)]
pub struct Page<'a> {
    browser: &'a dyn Browser,
    timeout: Duration,
    poll_interval: Duration,
    retry: RetryPolicy,
    options: OptionResolver,
}

impl<'a> Page<'a> {
    pub fn new(browser: &'a dyn Browser, timeout: Duration) -> Self {
        Page {
            browser,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryPolicy::CLICK,
            options: OptionResolver::default(),
        }
    }

    pub fn with_default_timeout(browser: &'a dyn Browser) -> Self {
        Self::new(browser, DEFAULT_TIMEOUT)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_option_resolver(mut self, options: OptionResolver) -> Self {
        self.options = options;
        self
    }

    pub fn browser(&self) -> &'a dyn Browser {
        self.browser
    }

    /// Wait using this page's timeout and poll interval.
    pub fn wait(&self) -> Wait<'a> {
        self.wait_for(self.timeout)
    }

    pub fn wait_for(&self, timeout: Duration) -> Wait<'a> {
        Wait::new(self.browser, timeout).poll_interval(self.poll_interval)
    }

    pub fn wait_visible(&self, locator: &Locator) -> Result<ElementRef, PageError> {
        self.wait()
            .visible(locator)
            .map_err(wait_err("wait for visible", locator))
    }

    pub fn wait_clickable(&self, locator: &Locator) -> Result<ElementRef, PageError> {
        self.wait()
            .clickable(locator)
            .map_err(wait_err("wait for clickable", locator))
    }

    /// Current matches, without waiting for any to appear.
    pub fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, PageError> {
        let _implicit = ImplicitWaitGuard::suspend(self.browser);
        self.browser
            .find_elements(locator)
            .map_err(driver_err("find elements", locator))
    }

    // ---- Actions ----

    /// Click once the element is clickable, retrying on stale references.
    pub fn click(&self, locator: &Locator) -> Result<(), PageError> {
        let result = self.retry.run(PageError::is_stale, |attempt| {
            debug!(%locator, attempt, "click");
            let element = self.wait_clickable(locator)?;
            self.browser
                .click(&element)
                .map_err(driver_err("click", locator))
        });

        match result {
            Ok(()) => {
                info!(%locator, "clicked");
                Ok(())
            }
            Err(RetryError::Exhausted { attempts, last }) => Err(PageError::ClickFailed {
                locator: locator.to_string(),
                attempts,
                source: Box::new(last),
            }),
            Err(RetryError::Fatal(e)) => Err(e),
        }
    }

    /// Clear the field and type `text`.
    pub fn type_text(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let element = self.wait_visible(locator)?;
        self.browser
            .clear(&element)
            .map_err(driver_err("clear", locator))?;
        self.browser
            .send_keys(&element, text)
            .map_err(driver_err("type", locator))?;
        info!(%locator, "typed text");
        Ok(())
    }

    /// Type `text` after whatever the field already holds.
    pub fn append_text(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let element = self.wait_visible(locator)?;
        self.browser
            .send_keys(&element, text)
            .map_err(driver_err("type", locator))?;
        info!(%locator, "appended text");
        Ok(())
    }

    pub fn text(&self, locator: &Locator) -> Result<String, PageError> {
        let element = self.wait_visible(locator)?;
        self.browser
            .text(&element)
            .map_err(driver_err("get text", locator))
    }

    pub fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>, PageError> {
        let element = self.wait_visible(locator)?;
        self.browser
            .attribute(&element, name)
            .map_err(driver_err("get attribute", locator))
    }

    /// Whether the first match is displayed. False when nothing matches or
    /// the lookup fails.
    pub fn is_displayed(&self, locator: &Locator) -> bool {
        self.current_state(locator, |b, el| b.is_displayed(el))
    }

    pub fn is_enabled(&self, locator: &Locator) -> bool {
        self.current_state(locator, |b, el| b.is_enabled(el))
    }

    fn current_state(
        &self,
        locator: &Locator,
        check: impl Fn(&dyn Browser, &ElementRef) -> Result<bool, DriverError>,
    ) -> bool {
        let _implicit = ImplicitWaitGuard::suspend(self.browser);
        let element = match self.browser.find_element(locator) {
            Ok(el) => el,
            Err(e) => {
                debug!(%locator, error = %e, "element not available");
                return false;
            }
        };
        check(self.browser, &element).unwrap_or_else(|e| {
            debug!(%locator, error = %e, "element state unavailable");
            false
        })
    }

    // ---- Native <select> ----

    fn options(&self, select: &ElementRef, locator: &Locator) -> Result<Vec<(ElementRef, String)>, PageError> {
        let options = self
            .browser
            .find_children(select, &Locator::tag("option"))
            .map_err(driver_err("list options", locator))?;

        options
            .into_iter()
            .map(|opt| {
                let text = self
                    .browser
                    .text(&opt)
                    .map_err(driver_err("read option", locator))?;
                Ok((opt, text.trim().to_string()))
            })
            .collect()
    }

    fn choose(&self, option: &ElementRef, locator: &Locator) -> Result<(), PageError> {
        self.browser
            .click(option)
            .map_err(driver_err("select option", locator))
    }

    /// Select by visible text: exact match first, then a match where either
    /// text contains the other.
    pub fn select_by_visible_text(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let select = self.wait_visible(locator)?;
        let options = self.options(&select, locator)?;
        let wanted = text.trim();

        debug!(
            %locator,
            options = ?options.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>(),
            "available options"
        );

        if let Some((opt, _)) = options.iter().find(|(_, t)| t == wanted) {
            self.choose(opt, locator)?;
            info!(%locator, option = wanted, "selected option");
            return Ok(());
        }

        let partial = options
            .iter()
            .find(|(_, t)| !t.is_empty() && (t.contains(wanted) || wanted.contains(t.as_str())));
        if let Some((opt, matched)) = partial {
            self.choose(opt, locator)?;
            info!(%locator, requested = wanted, option = %matched, "selected option by partial match");
            return Ok(());
        }

        Err(PageError::OptionNotFound {
            label: text.to_string(),
            locator: locator.to_string(),
        })
    }

    pub fn select_by_value(&self, locator: &Locator, value: &str) -> Result<(), PageError> {
        let select = self.wait_visible(locator)?;
        let option = Locator::xpath(format!(".//option[@value={}]", xpath_literal(value)));
        let matches = self
            .browser
            .find_children(&select, &option)
            .map_err(driver_err("select by value", locator))?;

        let Some(first) = matches.first() else {
            return Err(PageError::OptionNotFound {
                label: value.to_string(),
                locator: locator.to_string(),
            });
        };
        self.choose(first, locator)?;
        info!(%locator, value, "selected option by value");
        Ok(())
    }

    pub fn select_by_index(&self, locator: &Locator, index: usize) -> Result<(), PageError> {
        let select = self.wait_visible(locator)?;
        let options = self.options(&select, locator)?;
        let Some((opt, text)) = options.get(index) else {
            return Err(PageError::OptionIndexOutOfRange {
                index,
                available: options.len(),
                locator: locator.to_string(),
            });
        };
        self.choose(opt, locator)?;
        info!(%locator, index, option = %text, "selected option by index");
        Ok(())
    }

    // ---- Custom dropdown widget ----

    /// Expand the custom dropdown at `locator` and click the option labelled
    /// `label`, trying each option pattern in order.
    pub fn select_from_custom_dropdown(&self, locator: &Locator, label: &str) -> Result<(), PageError> {
        let widget_id = locator.id_value().unwrap_or_else(|| {
            debug!(%locator, "dropdown locator has no id; option patterns get an empty id");
            ""
        });

        let widget = self.wait_clickable(locator)?;
        self.browser
            .click(&widget)
            .map_err(driver_err("expand dropdown", locator))?;
        hard_wait(self.options.settle());

        let Some((option_locator, option)) = self.options.resolve(self.browser, widget_id, label) else {
            return Err(PageError::OptionNotFound {
                label: label.to_string(),
                locator: locator.to_string(),
            });
        };

        self.browser
            .click(&option)
            .map_err(driver_err("select dropdown option", &option_locator))?;
        info!(%locator, label, "selected dropdown option");
        Ok(())
    }

    // ---- Script helpers ----

    pub fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, PageError> {
        self.browser
            .execute_script(script, args)
            .map_err(|source| PageError::Driver {
                action: "execute script",
                locator: "-".to_string(),
                source,
            })
    }

    pub fn scroll_to(&self, locator: &Locator) -> Result<(), PageError> {
        let element = self.wait_visible(locator)?;
        self.browser
            .execute_script(
                "arguments[0].scrollIntoView({block: 'center'});",
                vec![element_arg(&element)],
            )
            .map_err(driver_err("scroll into view", locator))?;
        debug!(%locator, "scrolled into view");
        Ok(())
    }

    pub fn js_click(&self, locator: &Locator) -> Result<(), PageError> {
        let element = self
            .wait()
            .present(locator)
            .map_err(wait_err("script click", locator))?;
        self.browser
            .execute_script("arguments[0].click();", vec![element_arg(&element)])
            .map_err(driver_err("script click", locator))?;
        info!(%locator, "clicked via script");
        Ok(())
    }

    /// Assign `value` directly and fire a bubbling `change` event, for
    /// inputs whose own key handling rejects typed text.
    pub fn set_value_by_script(&self, locator: &Locator, value: &str) -> Result<(), PageError> {
        let element = self
            .wait()
            .present(locator)
            .map_err(wait_err("set value", locator))?;
        self.browser
            .clear(&element)
            .map_err(driver_err("clear", locator))?;
        self.browser
            .execute_script(
                "arguments[0].value = arguments[1]; \
                 arguments[0].dispatchEvent(new Event('change', { bubbles: true }));",
                vec![element_arg(&element), Value::String(value.to_string())],
            )
            .map_err(driver_err("set value", locator))?;
        info!(%locator, value, "value set via script");
        Ok(())
    }

    // ---- Page info ----

    pub fn navigate(&self, url: &str) -> Result<(), PageError> {
        info!(url, "navigating");
        self.browser.navigate(url).map_err(|source| PageError::Driver {
            action: "navigate",
            locator: url.to_string(),
            source,
        })
    }

    pub fn title(&self) -> Result<String, PageError> {
        self.browser.title().map_err(|source| PageError::Driver {
            action: "get title",
            locator: "-".to_string(),
            source,
        })
    }

    pub fn current_url(&self) -> Result<String, PageError> {
        self.browser.current_url().map_err(|source| PageError::Driver {
            action: "get url",
            locator: "-".to_string(),
            source,
        })
    }

    /// Log a skipped optional field.
    pub fn skip_optional(&self, field: &str, reason: &str) {
        warn!(field, reason, "optional field skipped");
    }
}
