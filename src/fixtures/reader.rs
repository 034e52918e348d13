use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read fixture {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("fixture {} does not match the expected shape: {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("key '{key}' not found in fixture {} (path '{path}')", .file.display())]
    KeyNotFound {
        file: PathBuf,
        path: String,
        key: String,
    },

    #[error("fixture {} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
}

/// Reads named JSON fixtures from a base directory.
///
/// UI data lives under `ui/`, API payloads under `api/`.
#[derive(Debug, Clone)]
pub struct FixtureReader {
    base_dir: PathBuf,
}

impl FixtureReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FixtureReader {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Reader scoped to `ui/`.
    pub fn ui(&self) -> FixtureReader {
        FixtureReader::new(self.base_dir.join("ui"))
    }

    /// Reader scoped to `api/`.
    pub fn api(&self) -> FixtureReader {
        FixtureReader::new(self.base_dir.join("api"))
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn read_string(&self, name: &str) -> Result<String, FixtureError> {
        let path = self.path(name);
        debug!(path = %path.display(), "reading fixture");
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FixtureError::NotFound { path, source },
            _ => FixtureError::Io { path, source },
        })
    }

    pub fn read_json(&self, name: &str) -> Result<Value, FixtureError> {
        let content = self.read_string(name)?;
        serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
            path: self.path(name),
            source,
        })
    }

    pub fn read_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, FixtureError> {
        let value = self.read_json(name)?;
        serde_json::from_value(value).map_err(|source| FixtureError::Shape {
            path: self.path(name),
            source,
        })
    }

    /// Top-level object of the fixture as a key/value map.
    pub fn read_map(&self, name: &str) -> Result<Map<String, Value>, FixtureError> {
        match self.read_json(name)? {
            Value::Object(map) => Ok(map),
            _ => Err(FixtureError::NotAnObject {
                path: self.path(name),
            }),
        }
    }

    /// Node at a dotted path such as `validUser.username`.
    pub fn node_at(&self, name: &str, dotted: &str) -> Result<Value, FixtureError> {
        let root = self.read_json(name)?;
        lookup(&root, dotted)
            .cloned()
            .map_err(|key| FixtureError::KeyNotFound {
                file: self.path(name),
                path: dotted.to_string(),
                key,
            })
    }

    /// Scalar at a dotted path rendered as text.
    pub fn value_at(&self, name: &str, dotted: &str) -> Result<String, FixtureError> {
        self.node_at(name, dotted).map(|v| as_text(&v))
    }
}

/// Walk a dotted path. On failure returns the first missing segment.
pub fn lookup<'v>(root: &'v Value, dotted: &str) -> Result<&'v Value, String> {
    dotted.split('.').try_fold(root, |node, key| {
        let next = match node {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => node.get(key),
        };
        next.ok_or_else(|| key.to_string())
    })
}

/// Render a JSON node as plain text: strings unquoted, null as empty.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let doc = json!({ "user": { "roles": ["adjuster", "admin"], "id": 7 } });
        assert_eq!(lookup(&doc, "user.id").unwrap(), &json!(7));
        assert_eq!(lookup(&doc, "user.roles.1").unwrap(), &json!("admin"));
        assert_eq!(lookup(&doc, "user.email").unwrap_err(), "email");
    }

    #[test]
    fn as_text_unquotes_strings() {
        assert_eq!(as_text(&json!("abc")), "abc");
        assert_eq!(as_text(&json!(42)), "42");
        assert_eq!(as_text(&json!(true)), "true");
        assert_eq!(as_text(&Value::Null), "");
    }
}
