use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::properties::parse_properties;

/// Primary configuration location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "resources/config.properties";

/// Secondary location tried when the primary one is unreadable.
pub const FALLBACK_CONFIG_PATH: &str = "config.properties";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration not found (tried: {})", display_paths(.tried))]
    NotFound { tried: Vec<PathBuf> },

    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("required configuration key '{0}' is not set")]
    Missing(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Config: immutable key/value store with typed accessors
// ============================================================================

/// Process-wide runtime configuration.
///
/// Built once at startup and shared read-only (usually as `Arc<Config>`)
/// with every worker. Absent keys fall back to fixed defaults; a present but
/// malformed typed value is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Load from the default primary path, then the fallback path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from `primary`, falling back to `config.properties` in the
    /// working directory. Fails when neither location can be read.
    pub fn load_from(primary: &Path) -> Result<Self, ConfigError> {
        let candidates = [primary.to_path_buf(), PathBuf::from(FALLBACK_CONFIG_PATH)];

        for path in &candidates {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    info!(path = %path.display(), "loaded configuration");
                    return Ok(Self::parse(&content));
                }
                Err(e) => debug!(path = %path.display(), error = %e, "configuration not readable"),
            }
        }

        Err(ConfigError::NotFound {
            tried: candidates.to_vec(),
        })
    }

    /// Parse a properties document directly.
    pub fn parse(content: &str) -> Self {
        Config {
            values: parse_properties(content),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Config {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Return a new config with `overrides` layered over this one.
    pub fn with_overrides<K, V>(&self, overrides: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = self.values.clone();
        for (k, v) in overrides {
            values.insert(k.into(), v.into());
        }
        Config { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// All entries sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(invalid(key, raw, "a boolean (true/false)")),
            },
        }
    }

    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| invalid(key, raw, "a non-negative integer")),
        }
    }

    fn seconds_or(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        self.u64_or(key, default).map(Duration::from_secs)
    }

    // ---- Named accessors ----

    pub fn browser(&self) -> &str {
        self.get_or("browser", "chrome")
    }

    pub fn headless(&self) -> Result<bool, ConfigError> {
        self.bool_or("headless", false)
    }

    pub fn environment(&self) -> &str {
        self.get_or("environment", "qa")
    }

    /// UI base URL for the active environment (`base.url.<env>`).
    pub fn base_url(&self) -> Option<&str> {
        self.get(&format!("base.url.{}", self.environment()))
    }

    /// API base URL for the active environment (`api.base.url.<env>`).
    pub fn api_base_url(&self) -> Option<&str> {
        self.get(&format!("api.base.url.{}", self.environment()))
    }

    pub fn implicit_wait(&self) -> Result<Duration, ConfigError> {
        self.seconds_or("implicit.wait", 10)
    }

    pub fn explicit_wait(&self) -> Result<Duration, ConfigError> {
        self.seconds_or("explicit.wait", 20)
    }

    pub fn page_load_timeout(&self) -> Result<Duration, ConfigError> {
        self.seconds_or("page.load.timeout", 30)
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username")
    }

    pub fn password(&self) -> Option<&str> {
        self.get("password")
    }

    pub fn parallel_execution(&self) -> Result<bool, ConfigError> {
        self.bool_or("parallel.execution", false)
    }

    pub fn thread_count(&self) -> Result<usize, ConfigError> {
        self.u64_or("thread.count", 3).map(|n| n as usize)
    }

    pub fn screenshot_on_failure(&self) -> Result<bool, ConfigError> {
        self.bool_or("screenshot.on.failure", true)
    }

    pub fn webdriver_url(&self) -> &str {
        self.get_or("webdriver.url", "http://localhost:9515")
    }

    pub fn test_data_dir(&self) -> PathBuf {
        PathBuf::from(self.get_or("test.data.dir", "test-assets/test-data"))
    }

    pub fn results_dir(&self) -> PathBuf {
        PathBuf::from(self.get_or("results.dir", "target/test-results"))
    }
}

fn invalid(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}
