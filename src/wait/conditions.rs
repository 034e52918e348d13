use std::fmt;

use crate::browser::driver::{Browser, DriverError, ElementRef};
use crate::browser::locator::Locator;

// ============================================================================
// Condition: what a wait is waiting for
// ============================================================================

/// Description of a wait condition, used in logs and timeout errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Visible(Locator),
    Clickable(Locator),
    Present(Locator),
    AllVisible(Locator),
    Invisible(Locator),
    TextContains { locator: Locator, text: String },
    AttributeContains {
        locator: Locator,
        attribute: String,
        value: String,
    },
    UrlContains(String),
    TitleContains(String),
    Custom(String),
}

impl Condition {
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Condition::Visible(l)
            | Condition::Clickable(l)
            | Condition::Present(l)
            | Condition::AllVisible(l)
            | Condition::Invisible(l)
            | Condition::TextContains { locator: l, .. }
            | Condition::AttributeContains { locator: l, .. } => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Visible(_) => write!(f, "element to be visible"),
            Condition::Clickable(_) => write!(f, "element to be clickable"),
            Condition::Present(_) => write!(f, "element to be present"),
            Condition::AllVisible(_) => write!(f, "all elements to be visible"),
            Condition::Invisible(_) => write!(f, "element to be invisible"),
            Condition::TextContains { text, .. } => write!(f, "element text to contain '{}'", text),
            Condition::AttributeContains {
                attribute, value, ..
            } => write!(f, "attribute '{}' to contain '{}'", attribute, value),
            Condition::UrlContains(s) => write!(f, "URL to contain '{}'", s),
            Condition::TitleContains(s) => write!(f, "title to contain '{}'", s),
            Condition::Custom(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Checks: one evaluation of a condition
// ============================================================================
//
// `Ok(None)` means "not yet". Checks look elements up with `find_elements`
// so absence never raises; staleness is handled by the polling loop.

fn first(browser: &dyn Browser, locator: &Locator) -> Result<Option<ElementRef>, DriverError> {
    Ok(browser.find_elements(locator)?.into_iter().next())
}

pub fn visible(browser: &dyn Browser, locator: &Locator) -> Result<Option<ElementRef>, DriverError> {
    match first(browser, locator)? {
        Some(el) if browser.is_displayed(&el)? => Ok(Some(el)),
        _ => Ok(None),
    }
}

pub fn clickable(browser: &dyn Browser, locator: &Locator) -> Result<Option<ElementRef>, DriverError> {
    match visible(browser, locator)? {
        Some(el) if browser.is_enabled(&el)? => Ok(Some(el)),
        _ => Ok(None),
    }
}

pub fn present(browser: &dyn Browser, locator: &Locator) -> Result<Option<ElementRef>, DriverError> {
    first(browser, locator)
}

pub fn all_visible(
    browser: &dyn Browser,
    locator: &Locator,
) -> Result<Option<Vec<ElementRef>>, DriverError> {
    let elements = browser.find_elements(locator)?;
    if elements.is_empty() {
        return Ok(None);
    }
    for el in &elements {
        if !browser.is_displayed(el)? {
            return Ok(None);
        }
    }
    Ok(Some(elements))
}

/// Satisfied when nothing matches, the match is hidden, or it went stale.
pub fn invisible(browser: &dyn Browser, locator: &Locator) -> Result<Option<()>, DriverError> {
    let Some(el) = first(browser, locator)? else {
        return Ok(Some(()));
    };
    match browser.is_displayed(&el) {
        Ok(true) => Ok(None),
        Ok(false) => Ok(Some(())),
        Err(e) if e.is_stale() || e.is_missing() => Ok(Some(())),
        Err(e) => Err(e),
    }
}

pub fn text_contains(
    browser: &dyn Browser,
    locator: &Locator,
    text: &str,
) -> Result<Option<ElementRef>, DriverError> {
    match first(browser, locator)? {
        Some(el) if browser.text(&el)?.contains(text) => Ok(Some(el)),
        _ => Ok(None),
    }
}

pub fn attribute_contains(
    browser: &dyn Browser,
    locator: &Locator,
    attribute: &str,
    value: &str,
) -> Result<Option<ElementRef>, DriverError> {
    let Some(el) = first(browser, locator)? else {
        return Ok(None);
    };
    let matches = browser
        .attribute(&el, attribute)?
        .is_some_and(|v| v.contains(value));
    Ok(matches.then_some(el))
}

pub fn url_contains(browser: &dyn Browser, fragment: &str) -> Result<Option<String>, DriverError> {
    let url = browser.current_url()?;
    Ok(url.contains(fragment).then_some(url))
}

pub fn title_contains(browser: &dyn Browser, fragment: &str) -> Result<Option<String>, DriverError> {
    let title = browser.title()?;
    Ok(title.contains(fragment).then_some(title))
}
