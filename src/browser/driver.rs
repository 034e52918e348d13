use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::browser::locator::Locator;

/// Opaque reference to an element in the current page.
///
/// Only valid until the page re-renders; a stale reference surfaces as
/// [`DriverError::StaleElement`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no such element: {0}")]
    NoSuchElement(String),

    #[error("stale element reference: {0}")]
    StaleElement(String),

    #[error("no browser session is initialized for this worker")]
    NotInitialized,

    #[error("failed to start {browser} session: {message}")]
    Launch { browser: String, message: String },

    #[error("WebDriver command '{command}' failed ({error}): {message}")]
    Protocol {
        command: String,
        error: String,
        message: String,
    },

    #[error("WebDriver transport error during '{command}': {source}")]
    Transport {
        command: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("WebDriver command '{command}' got no answer within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("unexpected response to '{command}': {detail}")]
    UnexpectedResponse { command: String, detail: String },
}

impl DriverError {
    pub fn is_stale(&self) -> bool {
        matches!(self, DriverError::StaleElement(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DriverError::NoSuchElement(_))
    }
}

// ============================================================================
// Browser: the session seam used by waits, pages and the runner
// ============================================================================

/// One live browser session.
///
/// Implemented by [`crate::browser::webdriver::WebDriverSession`] for real
/// browsers. Every method maps onto a single WebDriver command; policies such
/// as waiting and retrying live in [`crate::wait`] and [`crate::pages`].
pub trait Browser {
    /// Identifier used in logs and screenshot names.
    fn session_id(&self) -> &str;

    fn navigate(&self, url: &str) -> Result<(), DriverError>;
    fn current_url(&self) -> Result<String, DriverError>;
    fn title(&self) -> Result<String, DriverError>;
    fn page_source(&self) -> Result<String, DriverError>;

    /// All matches for `locator`; empty when nothing matches.
    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, DriverError>;

    /// Matches for `locator` scoped to the subtree of `parent`.
    fn find_children(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError>;

    fn click(&self, element: &ElementRef) -> Result<(), DriverError>;
    fn clear(&self, element: &ElementRef) -> Result<(), DriverError>;
    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    fn text(&self, element: &ElementRef) -> Result<String, DriverError>;
    fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>, DriverError>;
    fn tag_name(&self, element: &ElementRef) -> Result<String, DriverError>;
    fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError>;
    fn is_enabled(&self, element: &ElementRef) -> Result<bool, DriverError>;

    /// Run a synchronous script. Element arguments are passed with
    /// [`element_arg`].
    fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError>;

    /// PNG bytes of the current viewport.
    fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    fn maximize_window(&self) -> Result<(), DriverError>;
    fn set_timeouts(&self, implicit: Duration, page_load: Duration) -> Result<(), DriverError>;

    /// Change only the implicit element-lookup wait.
    fn set_implicit_wait(&self, implicit: Duration) -> Result<(), DriverError>;

    /// The implicit wait last applied to this session.
    fn implicit_wait(&self) -> Duration;
    fn delete_all_cookies(&self) -> Result<(), DriverError>;

    /// End the session. Implementations must tolerate being called once only.
    fn quit(&self) -> Result<(), DriverError>;

    /// First match for `locator`, or [`DriverError::NoSuchElement`].
    fn find_element(&self, locator: &Locator) -> Result<ElementRef, DriverError> {
        self.find_elements(locator)?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NoSuchElement(locator.to_string()))
    }
}

/// W3C web element identifier key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Encode an element reference as a script argument.
pub fn element_arg(element: &ElementRef) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(ELEMENT_KEY.to_string(), Value::String(element.id().to_string()));
    Value::Object(map)
}
