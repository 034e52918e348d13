use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::browser::driver::{Browser, ElementRef};
use crate::browser::locator::Locator;
use crate::pages::base::{Page, PageError};

/// Elements listed per group.
pub const MAX_PER_GROUP: usize = 10;

/// Characters of page source kept in the inventory.
pub const SOURCE_PREVIEW_CHARS: usize = 1000;

/// Attribute/text values longer than this are left out of a summary.
const MAX_VALUE_LEN: usize = 50;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ElementSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ElementSummary {
    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.kind.is_none()
            && self.class.is_none()
            && self.text.is_none()
            && self.value.is_none()
    }
}

impl fmt::Display for ElementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("id", &self.id),
            ("name", &self.name),
            ("type", &self.kind),
            ("class", &self.class),
            ("text", &self.text),
            ("value", &self.value),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}='{}'", k, v)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementGroup {
    pub label: String,
    pub total: usize,
    pub elements: Vec<ElementSummary>,
}

/// Snapshot of the locator-relevant elements on the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct ElementInventory {
    pub url: String,
    pub title: String,
    pub groups: Vec<ElementGroup>,
    pub source_preview: String,
}

impl fmt::Display for ElementInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "URL:   {}", self.url)?;
        writeln!(f, "Title: {}", self.title)?;
        for group in &self.groups {
            writeln!(f, "\n--- {} (found: {}) ---", group.label, group.total)?;
            for (i, el) in group.elements.iter().enumerate() {
                writeln!(f, "  [{}] {}", i + 1, el)?;
            }
            if group.total > group.elements.len() {
                writeln!(f, "  ... and {} more", group.total - group.elements.len())?;
            }
        }
        writeln!(f, "\n--- Page source (first {} chars) ---", SOURCE_PREVIEW_CHARS)?;
        writeln!(f, "{}", self.source_preview)
    }
}

/// Groups reported by [`inventory`], in output order.
pub fn default_groups() -> Vec<(&'static str, Locator)> {
    vec![
        ("Links", Locator::tag("a")),
        ("Buttons", Locator::tag("button")),
        ("Input buttons", Locator::xpath("//input[@type='button' or @type='submit']")),
        ("Input fields", Locator::tag("input")),
        ("Select dropdowns", Locator::tag("select")),
        (
            "Claim elements",
            Locator::xpath("//*[contains(translate(text(), 'CLAIM', 'claim'), 'claim')]"),
        ),
        (
            "Navigation",
            Locator::xpath("//*[contains(@class, 'menu') or contains(@class, 'tab') or contains(@class, 'nav')]"),
        ),
    ]
}

fn short(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v.chars().count() < MAX_VALUE_LEN)
}

fn summarize(browser: &dyn Browser, element: &ElementRef) -> ElementSummary {
    let attr = |name: &str| {
        browser
            .attribute(element, name)
            .ok()
            .flatten()
            .filter(|v| !v.is_empty())
    };
    ElementSummary {
        id: attr("id"),
        name: attr("name"),
        kind: attr("type"),
        class: attr("class"),
        text: short(browser.text(element).ok()),
        value: short(attr("value")),
    }
}

/// Collect up to [`MAX_PER_GROUP`] summaries per group plus a page-source
/// preview. Elements that fail to read are skipped.
pub fn inventory(page: &Page<'_>) -> Result<ElementInventory, PageError> {
    let browser = page.browser();
    let mut groups = Vec::new();

    for (label, locator) in default_groups() {
        let found = match browser.find_elements(&locator) {
            Ok(found) => found,
            Err(e) => {
                warn!(group = label, error = %e, "element lookup failed");
                Vec::new()
            }
        };
        let elements: Vec<ElementSummary> = found
            .iter()
            .take(MAX_PER_GROUP)
            .map(|el| summarize(browser, el))
            .filter(|s| !s.is_empty())
            .collect();
        debug!(group = label, total = found.len(), "element group collected");
        groups.push(ElementGroup {
            label: label.to_string(),
            total: found.len(),
            elements,
        });
    }

    let source = browser.page_source().unwrap_or_default();
    let mut source_preview: String = source.chars().take(SOURCE_PREVIEW_CHARS).collect();
    if source.chars().count() > SOURCE_PREVIEW_CHARS {
        source_preview.push_str("...");
    }

    Ok(ElementInventory {
        url: page.current_url()?,
        title: page.title()?,
        groups,
        source_preview,
    })
}
