use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::debug;

/// Directory under `results.dir` that holds attachment files.
pub const ATTACHMENTS_DIR: &str = "attachments";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "image/png")]
    Png,
}

impl MimeType {
    pub fn extension(&self) -> &'static str {
        match self {
            MimeType::TextPlain => "txt",
            MimeType::Json => "json",
            MimeType::Png => "png",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::TextPlain => "text/plain",
            MimeType::Json => "application/json",
            MimeType::Png => "image/png",
        }
    }
}

/// A named blob produced while a scenario runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub mime: MimeType,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn text(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            mime: MimeType::TextPlain,
            data: content.as_bytes().to_vec(),
        }
    }

    /// Pretty-printed JSON. Falls back to the compact form if pretty printing fails.
    pub fn json(name: &str, value: &serde_json::Value) -> Self {
        let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self {
            name: name.to_string(),
            mime: MimeType::Json,
            data: rendered.into_bytes(),
        }
    }

    pub fn png(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: MimeType::Png,
            data: bytes,
        }
    }

    /// Lowercase hex sha1 of the content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(&self.data);
        format!("{:x}", hasher.finalize())
    }
}

/// Reference to a stored attachment, carried by the scenario result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    pub mime: MimeType,
    pub path: PathBuf,
    pub sha1: String,
}

/// Writes attachments to `<results_dir>/attachments/<sha1>.<ext>`.
///
/// Identical content maps to the same file, so re-attaching it is free.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(results_dir: &Path) -> Self {
        Self {
            dir: results_dir.join(ATTACHMENTS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn store(&self, attachment: &Attachment) -> io::Result<AttachmentRef> {
        fs::create_dir_all(&self.dir)?;
        let sha1 = attachment.digest();
        let path = self
            .dir
            .join(format!("{}.{}", sha1, attachment.mime.extension()));
        if !path.exists() {
            fs::write(&path, &attachment.data)?;
        }
        debug!(name = %attachment.name, path = %path.display(), "attachment stored");
        Ok(AttachmentRef {
            name: attachment.name.clone(),
            mime: attachment.mime,
            path,
            sha1,
        })
    }
}
