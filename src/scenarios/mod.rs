//! The scenario catalog.

pub mod api_login;
pub mod claims;
pub mod inspect;
pub mod login;

use crate::runner::scenario::Scenario;

/// Every scenario, in catalog order.
pub fn all() -> Vec<Scenario> {
    let mut catalog = Vec::new();
    catalog.extend(login::scenarios());
    catalog.extend(api_login::scenarios());
    catalog.extend(claims::scenarios());
    catalog.extend(inspect::scenarios());
    catalog
}

/// Catalog scenarios in `suite` (prefix match on the dotted suite name)
/// whose full name contains `filter`.
pub fn select(suite: Option<&str>, filter: Option<&str>) -> Vec<Scenario> {
    all()
        .into_iter()
        .filter(|s| suite.is_none_or(|prefix| s.in_suite(prefix)))
        .filter(|s| filter.is_none_or(|f| s.matches(f)))
        .collect()
}

pub fn find(full_name: &str) -> Option<Scenario> {
    all()
        .into_iter()
        .find(|s| s.full_name() == full_name || s.name == full_name)
}
