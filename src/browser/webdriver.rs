use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::browser::capabilities::BrowserKind;
use crate::browser::driver::{Browser, DriverError, ElementRef};
use crate::browser::locator::Locator;
use crate::browser::manager::SessionLauncher;

/// Upper bound on a single WebDriver command. Page loads are bounded by
/// the session's own page-load timeout, which is always shorter.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Translation between harness types and fantoccini
// ============================================================================

/// fantoccini locator for a `(using, value)` pair from [`Locator::strategy`].
/// Tag names are valid CSS selectors.
pub fn wire_locator<'a>(using: &str, value: &'a str) -> fantoccini::Locator<'a> {
    match using {
        "xpath" => fantoccini::Locator::XPath(value),
        "link text" => fantoccini::Locator::LinkText(value),
        _ => fantoccini::Locator::Css(value),
    }
}

/// Map a fantoccini failure onto a driver error.
pub fn classify_error(command: &str, error: CmdError) -> DriverError {
    match error {
        CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::NoSuchElement) => {
            DriverError::NoSuchElement(wd.message.to_string())
        }
        CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::StaleElementReference) => {
            DriverError::StaleElement(wd.message.to_string())
        }
        CmdError::Standard(wd) => DriverError::Protocol {
            command: command.to_string(),
            error: format!("{:?}", wd.error),
            message: wd.message.to_string(),
        },
        other => DriverError::Transport {
            command: command.to_string(),
            source: other,
        },
    }
}

// ============================================================================
// WebDriverSession: Browser over a remote WebDriver server
// ============================================================================

/// A live session on a WebDriver server (chromedriver, geckodriver,
/// msedgedriver or a Selenium Grid).
///
/// The session owns a single-threaded tokio runtime and blocks on it for
/// every command, so callers stay synchronous. Elements handed out as
/// [`ElementRef`]s are kept by id until the next navigation.
pub struct WebDriverSession {
    runtime: Runtime,
    client: Client,
    session_id: String,
    elements: Mutex<HashMap<String, Element>>,
    implicit_ms: AtomicU64,
}

impl WebDriverSession {
    /// Start a new browser session on `server_url`.
    pub fn start(server_url: &str, kind: BrowserKind, headless: bool) -> Result<Self, DriverError> {
        let launch_err = |message: String| DriverError::Launch {
            browser: kind.to_string(),
            message,
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| launch_err(format!("failed to create runtime: {}", e)))?;

        let capabilities = kind.always_match(headless);
        let connected = runtime.block_on(async {
            let mut builder = ClientBuilder::native();
            builder.capabilities(capabilities);
            tokio::time::timeout(COMMAND_TIMEOUT, builder.connect(server_url)).await
        });
        let client = match connected {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => return Err(launch_err(e.to_string())),
            Err(_) => return Err(launch_err(format!("no answer from {} within {:?}", server_url, COMMAND_TIMEOUT))),
        };

        let session_id = runtime
            .block_on(client.session_id())
            .ok()
            .flatten()
            .unwrap_or_else(|| format!("{}-session", kind));

        info!(session = %session_id, browser = %kind, headless, "browser session started");

        Ok(WebDriverSession {
            runtime,
            client,
            session_id,
            elements: Mutex::new(HashMap::new()),
            implicit_ms: AtomicU64::new(0),
        })
    }

    /// Drive one command to completion on the session runtime.
    fn run<T, F>(&self, command: &str, fut: F) -> Result<T, DriverError>
    where
        F: Future<Output = Result<T, CmdError>>,
    {
        debug!(session = %self.session_id, command, "webdriver command");
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(COMMAND_TIMEOUT, fut).await });
        match outcome {
            Ok(result) => result.map_err(|e| classify_error(command, e)),
            Err(_) => Err(DriverError::Timeout {
                command: command.to_string(),
                timeout: COMMAND_TIMEOUT,
            }),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Element>> {
        self.elements.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn remember(&self, found: Vec<Element>) -> Vec<ElementRef> {
        let mut cache = self.cache();
        found
            .into_iter()
            .map(|element| {
                let id = element.element_id().to_string();
                cache.insert(id.clone(), element);
                ElementRef(id)
            })
            .collect()
    }

    /// Unknown ids belong to a page that has since been replaced.
    fn element(&self, element: &ElementRef) -> Result<Element, DriverError> {
        self.cache()
            .get(element.id())
            .cloned()
            .ok_or_else(|| DriverError::StaleElement(element.id().to_string()))
    }
}

impl Browser for WebDriverSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.run("navigate", self.client.goto(url))?;
        self.cache().clear();
        Ok(())
    }

    fn current_url(&self) -> Result<String, DriverError> {
        self.run("current url", self.client.current_url())
            .map(|url| url.to_string())
    }

    fn title(&self) -> Result<String, DriverError> {
        self.run("title", self.client.title())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.run("page source", self.client.source())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, DriverError> {
        let (using, value) = locator.strategy();
        let found = self.run("find elements", self.client.find_all(wire_locator(using, &value)))?;
        Ok(self.remember(found))
    }

    fn find_children(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError> {
        let parent = self.element(parent)?;
        let (using, value) = locator.strategy();
        let found = self.run("find child elements", parent.find_all(wire_locator(using, &value)))?;
        Ok(self.remember(found))
    }

    fn click(&self, element: &ElementRef) -> Result<(), DriverError> {
        let element = self.element(element)?;
        self.run("click", element.click())
    }

    fn clear(&self, element: &ElementRef) -> Result<(), DriverError> {
        let element = self.element(element)?;
        self.run("clear", element.clear())
    }

    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        let element = self.element(element)?;
        self.run("send keys", element.send_keys(text))
    }

    fn text(&self, element: &ElementRef) -> Result<String, DriverError> {
        let element = self.element(element)?;
        self.run("element text", element.text())
    }

    fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>, DriverError> {
        let element = self.element(element)?;
        self.run("element attribute", element.attr(name))
    }

    fn tag_name(&self, element: &ElementRef) -> Result<String, DriverError> {
        let element = self.element(element)?;
        self.run("element tag name", element.tag_name())
    }

    fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError> {
        let element = self.element(element)?;
        self.run("is displayed", element.is_displayed())
    }

    fn is_enabled(&self, element: &ElementRef) -> Result<bool, DriverError> {
        let element = self.element(element)?;
        self.run("is enabled", element.is_enabled())
    }

    fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        self.run("execute script", self.client.execute(script, args))
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.run("screenshot", self.client.screenshot())
    }

    fn maximize_window(&self) -> Result<(), DriverError> {
        self.run("maximize window", self.client.maximize_window())
    }

    fn set_timeouts(&self, implicit: Duration, page_load: Duration) -> Result<(), DriverError> {
        let timeouts = TimeoutConfiguration::new(None, Some(page_load), Some(implicit));
        self.run("set timeouts", self.client.update_timeouts(timeouts))?;
        self.implicit_ms
            .store(implicit.as_millis() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn set_implicit_wait(&self, implicit: Duration) -> Result<(), DriverError> {
        let timeouts = TimeoutConfiguration::new(None, None, Some(implicit));
        self.run("set implicit wait", self.client.update_timeouts(timeouts))?;
        self.implicit_ms
            .store(implicit.as_millis() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_ms.load(Ordering::Relaxed))
    }

    fn delete_all_cookies(&self) -> Result<(), DriverError> {
        self.run("delete cookies", self.client.delete_all_cookies())
    }

    fn quit(&self) -> Result<(), DriverError> {
        self.run("delete session", self.client.clone().close())?;
        self.cache().clear();
        info!(session = %self.session_id, "browser session closed");
        Ok(())
    }
}

// ============================================================================
// Launcher
// ============================================================================

/// Starts [`WebDriverSession`]s against a fixed server URL.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    server_url: String,
}

impl WebDriverLauncher {
    pub fn new(server_url: impl Into<String>) -> Self {
        WebDriverLauncher {
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl SessionLauncher for WebDriverLauncher {
    fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>, DriverError> {
        let session = WebDriverSession::start(&self.server_url, kind, headless)?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locators_map_onto_wire_strategies() {
        let (using, value) = Locator::id("Login-userName").strategy();
        assert!(matches!(
            wire_locator(using, &value),
            fantoccini::Locator::Css("[id=\"Login-userName\"]")
        ));

        let (using, value) = Locator::xpath("//div[@role='option']").strategy();
        assert!(matches!(
            wire_locator(using, &value),
            fantoccini::Locator::XPath("//div[@role='option']")
        ));

        let (using, value) = Locator::tag("select").strategy();
        assert!(matches!(wire_locator(using, &value), fantoccini::Locator::Css("select")));

        let (using, value) = Locator::link_text("Log Out").strategy();
        assert!(matches!(wire_locator(using, &value), fantoccini::Locator::LinkText("Log Out")));
    }

    #[test]
    fn unreachable_server_fails_launch() {
        match WebDriverSession::start("http://127.0.0.1:1", BrowserKind::Firefox, true) {
            Err(DriverError::Launch { browser, .. }) => assert_eq!(browser, "firefox"),
            Err(other) => panic!("expected launch error, got {}", other),
            Ok(_) => panic!("expected launch error, got a session"),
        }
    }
}
