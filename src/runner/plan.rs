use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::scenario::Scenario;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("cannot read suite plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid suite plan {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("suite plan '{plan}' names unknown scenario or suite '{entry}'")]
    UnknownEntry { plan: String, entry: String },
}

// ============================================================================
// SuitePlan: YAML selection of catalog scenarios
// ============================================================================

/// A named selection of scenarios, loaded from YAML:
///
/// ```yaml
/// name: Regression
/// parallel: true
/// threads: 3
/// scenarios:
///   - ui.login
///   - api.login::test_login_response_time
/// ```
///
/// Entries are suite prefixes (`ui`, `ui.claims`), full names
/// (`suite::name`) or bare scenario names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitePlan {
    pub name: String,

    #[serde(default)]
    pub scenarios: Vec<String>,

    #[serde(default)]
    pub parallel: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl SuitePlan {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| PlanError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load one plan file, or every `.yaml`/`.yml` file of a directory sorted by plan name.
    pub fn load_all(path: &Path) -> Result<Vec<Self>, PlanError> {
        let io_err = |source: std::io::Error| PlanError::Io {
            path: path.to_path_buf(),
            source,
        };
        if !path.is_dir() {
            return Ok(vec![Self::load(path)?]);
        }

        let mut plans = Vec::new();
        for entry in std::fs::read_dir(path).map_err(io_err)? {
            let p = entry.map_err(io_err)?.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                plans.push(Self::load(&p)?);
            }
        }
        // Sort by name for deterministic order
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    /// Scenarios of `catalog` named by this plan, in plan order, without
    /// duplicates. Scenarios matched by one suite prefix keep catalog order.
    pub fn select(&self, catalog: &[Scenario]) -> Result<Vec<Scenario>, PlanError> {
        let mut selected: Vec<Scenario> = Vec::new();
        for entry in &self.scenarios {
            let matched: Vec<&Scenario> = catalog
                .iter()
                .filter(|s| s.full_name() == *entry || s.name == entry.as_str() || s.in_suite(entry))
                .collect();
            if matched.is_empty() {
                return Err(PlanError::UnknownEntry {
                    plan: self.name.clone(),
                    entry: entry.clone(),
                });
            }
            for scenario in matched {
                if !selected.iter().any(|s| s.full_name() == scenario.full_name()) {
                    selected.push(*scenario);
                }
            }
        }
        Ok(selected)
    }

    /// Worker count for this plan: `threads` when parallel, otherwise 1.
    pub fn workers(&self, default_threads: usize) -> usize {
        if self.parallel {
            self.threads.unwrap_or(default_threads).max(1)
        } else {
            1
        }
    }
}
