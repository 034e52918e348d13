use std::fmt;

use crate::error::HarnessError;
use crate::runner::context::ScenarioContext;

/// Whether a scenario needs a browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Setup launches a browser and opens the base URL; teardown quits it.
    Ui,
    /// No browser; the body talks HTTP only.
    Api,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Ui => write!(f, "ui"),
            ScenarioKind::Api => write!(f, "api"),
        }
    }
}

pub type ScenarioBody = fn(&ScenarioContext) -> Result<(), HarnessError>;

/// A named, catalogued test case.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub suite: &'static str,
    pub description: &'static str,
    pub kind: ScenarioKind,
    pub body: ScenarioBody,
}

impl Scenario {
    pub const fn ui(
        suite: &'static str,
        name: &'static str,
        description: &'static str,
        body: ScenarioBody,
    ) -> Self {
        Scenario {
            name,
            suite,
            description,
            kind: ScenarioKind::Ui,
            body,
        }
    }

    pub const fn api(
        suite: &'static str,
        name: &'static str,
        description: &'static str,
        body: ScenarioBody,
    ) -> Self {
        Scenario {
            name,
            suite,
            description,
            kind: ScenarioKind::Api,
            body,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    /// True when `prefix` names this scenario's suite or one of its parents
    /// (`ui` matches `ui.login`).
    pub fn in_suite(&self, prefix: &str) -> bool {
        self.suite == prefix
            || self
                .suite
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Case-insensitive substring match on the full name.
    pub fn matches(&self, filter: &str) -> bool {
        self.full_name()
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
