use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Locator: strategy + selector
// ============================================================================

/// How to find an element on the page.
///
/// Locators are plain values. They resolve to element references only at
/// lookup time and the references are never cached between actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Name(String),
    Css(String),
    XPath(String),
    LinkText(String),
    Tag(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Locator::LinkText(value.into())
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Locator::Tag(value.into())
    }

    /// The W3C `using` / `value` pair for element lookup.
    ///
    /// WebDriver has no native id or name strategy, so both are expressed as
    /// CSS attribute selectors.
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Id(v) => ("css selector", format!("[id=\"{}\"]", css_escape(v))),
            Locator::Name(v) => ("css selector", format!("[name=\"{}\"]", css_escape(v))),
            Locator::Css(v) => ("css selector", v.clone()),
            Locator::XPath(v) => ("xpath", v.clone()),
            Locator::LinkText(v) => ("link text", v.clone()),
            Locator::Tag(v) => ("tag name", v.clone()),
        }
    }

    /// The element id when this is an id locator.
    pub fn id_value(&self) -> Option<&str> {
        match self {
            Locator::Id(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::Name(v) => write!(f, "name={}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::LinkText(v) => write!(f, "link={}", v),
            Locator::Tag(v) => write!(f, "tag={}", v),
        }
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `value` as an XPath string literal.
///
/// Values containing both quote kinds are split and joined with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
