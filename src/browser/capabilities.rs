use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::config::{Config, ConfigError};

/// Supported browser families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl BrowserKind {
    /// Parse a configured browser name. Unknown names fall back to Chrome.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "chrome" => BrowserKind::Chrome,
            "firefox" => BrowserKind::Firefox,
            "edge" => BrowserKind::Edge,
            other => {
                warn!(browser = other, "unsupported browser, defaulting to chrome");
                BrowserKind::Chrome
            }
        }
    }

    pub fn browser_name(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "MicrosoftEdge",
        }
    }

    /// Command-line switches passed to the browser binary.
    pub fn args(&self, headless: bool) -> Vec<&'static str> {
        let mut args = Vec::new();
        match self {
            BrowserKind::Chrome => {
                if headless {
                    args.push("--headless=new");
                }
                args.extend([
                    "--disable-dev-shm-usage",
                    "--no-sandbox",
                    "--disable-gpu",
                    "--disable-extensions",
                    "--disable-popup-blocking",
                    "--start-maximized",
                    "--remote-allow-origins=*",
                ]);
            }
            BrowserKind::Firefox => {
                if headless {
                    args.push("--headless");
                }
                args.extend(["--width=1920", "--height=1080"]);
            }
            BrowserKind::Edge => {
                if headless {
                    args.push("--headless");
                }
                args.extend(["--disable-dev-shm-usage", "--no-sandbox", "--start-maximized"]);
            }
        }
        args
    }

    /// `alwaysMatch` capabilities for a new-session request.
    pub fn always_match(&self, headless: bool) -> Map<String, Value> {
        let args = self.args(headless);
        let vendor = match self {
            BrowserKind::Chrome => json!({
                "goog:chromeOptions": {
                    "args": args,
                    "excludeSwitches": ["enable-automation"],
                    "useAutomationExtension": false,
                }
            }),
            BrowserKind::Firefox => json!({ "moz:firefoxOptions": { "args": args } }),
            BrowserKind::Edge => json!({ "ms:edgeOptions": { "args": args } }),
        };

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), Value::from(self.browser_name()));
        if let Value::Object(extra) = vendor {
            caps.extend(extra);
        }
        caps
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// Settings applied to every session right after it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPolicy {
    pub maximize: bool,
    pub implicit_wait: Duration,
    pub page_load_timeout: Duration,
    pub clear_cookies: bool,
}

impl SessionPolicy {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(SessionPolicy {
            maximize: true,
            implicit_wait: config.implicit_wait()?,
            page_load_timeout: config.page_load_timeout()?,
            clear_cookies: true,
        })
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            maximize: true,
            implicit_wait: Duration::from_secs(10),
            page_load_timeout: Duration::from_secs(30),
            clear_cookies: true,
        }
    }
}
