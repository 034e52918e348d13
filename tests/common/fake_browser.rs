#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use fnol_harness::browser::capabilities::BrowserKind;
use fnol_harness::browser::driver::{Browser, DriverError, ELEMENT_KEY, ElementRef};
use fnol_harness::browser::locator::Locator;
use fnol_harness::browser::manager::SessionLauncher;
use serde_json::Value;

// ============================================================================
// FakeBrowser: scripted in-memory session
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub locator: Option<Locator>,
    pub parent: Option<String>,
    pub child_locator: Option<Locator>,
    pub tag: String,
    pub text: String,
    pub value: String,
    pub displayed: bool,
    pub enabled: bool,
    pub attributes: HashMap<String, String>,
    /// Clicks that still fail with a stale reference before one succeeds.
    pub stale_clicks: u32,
    pub clicks: u32,
    /// URL the session moves to when this element is clicked.
    pub click_navigates_to: Option<String>,
    /// Locators that become displayed when this element is clicked.
    pub click_reveals: Vec<Locator>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub url: String,
    pub title: String,
    pub source: String,
    pub elements: Vec<(String, FakeElement)>,
    pub scripts: Vec<String>,
    pub script_results: Vec<(String, Value)>,
    pub screenshot: Vec<u8>,
    pub commands: Vec<String>,
    pub quit_calls: u32,
    pub fail_quit: bool,
    pub fail_maximize: bool,
    pub timeouts: Option<(Duration, Duration)>,
    /// Empty lookups block this long, as a WebDriver server would.
    pub implicit: Duration,
    next_id: u32,
}

/// A browser whose page is a list of scripted elements. Clones share state,
/// so a test can keep a handle after the session moves into a manager.
#[derive(Debug, Clone)]
pub struct FakeBrowser {
    id: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBrowser {
    pub fn new(id: &str) -> Self {
        FakeBrowser {
            id: id.to_string(),
            state: Arc::new(Mutex::new(FakeState {
                url: "about:blank".to_string(),
                screenshot: vec![0x89, b'P', b'N', b'G'],
                ..FakeState::default()
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Add a visible, enabled element matched by `locator`. Returns its id.
    pub fn add(&self, locator: Locator, text: &str) -> String {
        self.add_element(FakeElement {
            locator: Some(locator),
            text: text.to_string(),
            tag: "div".to_string(),
            displayed: true,
            enabled: true,
            ..FakeElement::default()
        })
    }

    /// Add a child of `parent` matched by `locator` within that subtree.
    pub fn add_child(&self, parent: &str, locator: Locator, text: &str) -> String {
        self.add_element(FakeElement {
            parent: Some(parent.to_string()),
            child_locator: Some(locator),
            text: text.to_string(),
            tag: "option".to_string(),
            displayed: true,
            enabled: true,
            ..FakeElement::default()
        })
    }

    pub fn add_element(&self, element: FakeElement) -> String {
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("el-{}", state.next_id);
        state.elements.push((id.clone(), element));
        id
    }

    pub fn update(&self, id: &str, f: impl FnOnce(&mut FakeElement)) {
        let mut state = self.state();
        if let Some((_, el)) = state.elements.iter_mut().find(|(eid, _)| eid == id) {
            f(el);
        }
    }

    pub fn element(&self, id: &str) -> FakeElement {
        self.state()
            .elements
            .iter()
            .find(|(eid, _)| eid == id)
            .map(|(_, el)| el.clone())
            .unwrap_or_default()
    }

    pub fn set_url(&self, url: &str) {
        self.state().url = url.to_string();
    }

    pub fn set_title(&self, title: &str) {
        self.state().title = title.to_string();
    }

    pub fn set_source(&self, source: &str) {
        self.state().source = source.to_string();
    }

    /// Scripts containing `fragment` return `result`.
    pub fn on_script(&self, fragment: &str, result: Value) {
        self.state().script_results.push((fragment.to_string(), result));
    }

    pub fn quit_calls(&self) -> u32 {
        self.state().quit_calls
    }

    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    fn record(&self, command: impl Into<String>) {
        self.state().commands.push(command.into());
    }

    /// Matching ids; an empty result first sits out the implicit wait.
    fn lookup(&self, matches: impl Fn(&FakeElement) -> bool) -> Result<Vec<ElementRef>, DriverError> {
        let collect = |state: &FakeState| -> Vec<ElementRef> {
            state
                .elements
                .iter()
                .filter(|(_, el)| matches(el))
                .map(|(id, _)| ElementRef(id.clone()))
                .collect()
        };

        let (found, implicit) = {
            let state = self.state();
            (collect(&state), state.implicit)
        };
        if !found.is_empty() || implicit.is_zero() {
            return Ok(found);
        }
        std::thread::sleep(implicit);
        Ok(collect(&self.state()))
    }

    fn with_element<T>(
        &self,
        element: &ElementRef,
        f: impl FnOnce(&mut FakeElement) -> T,
    ) -> Result<T, DriverError> {
        let mut state = self.state();
        match state.elements.iter_mut().find(|(id, _)| id == element.id()) {
            Some((_, el)) => Ok(f(el)),
            None => Err(DriverError::StaleElement(element.id().to_string())),
        }
    }
}

impl Browser for FakeBrowser {
    fn session_id(&self) -> &str {
        &self.id
    }

    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.record(format!("navigate {}", url));
        self.state().url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state().url.clone())
    }

    fn title(&self) -> Result<String, DriverError> {
        Ok(self.state().title.clone())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        Ok(self.state().source.clone())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, DriverError> {
        self.lookup(|el| el.locator.as_ref() == Some(locator))
    }

    fn find_children(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, DriverError> {
        self.lookup(|el| {
            el.parent.as_deref() == Some(parent.id()) && el.child_locator.as_ref() == Some(locator)
        })
    }

    fn click(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.record(format!("click {}", element.id()));
        let (navigate, reveal) = self.with_element(element, |el| {
            if el.stale_clicks > 0 {
                el.stale_clicks -= 1;
                return Err(());
            }
            el.clicks += 1;
            Ok((el.click_navigates_to.clone(), el.click_reveals.clone()))
        })?
        .map_err(|_| DriverError::StaleElement(element.id().to_string()))?;

        let mut state = self.state();
        if let Some(url) = navigate {
            state.url = url;
        }
        for locator in reveal {
            for (_, el) in state.elements.iter_mut() {
                if el.locator.as_ref() == Some(&locator) {
                    el.displayed = true;
                }
            }
        }
        Ok(())
    }

    fn clear(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.with_element(element, |el| el.value.clear())
    }

    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        self.with_element(element, |el| el.value.push_str(text))
    }

    fn text(&self, element: &ElementRef) -> Result<String, DriverError> {
        self.with_element(element, |el| el.text.clone())
    }

    fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>, DriverError> {
        self.with_element(element, |el| match name {
            "value" => Some(el.value.clone()),
            _ => el.attributes.get(name).cloned(),
        })
    }

    fn tag_name(&self, element: &ElementRef) -> Result<String, DriverError> {
        self.with_element(element, |el| el.tag.clone())
    }

    fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError> {
        self.with_element(element, |el| el.displayed)
    }

    fn is_enabled(&self, element: &ElementRef) -> Result<bool, DriverError> {
        self.with_element(element, |el| el.enabled)
    }

    fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        let mut state = self.state();
        state.scripts.push(script.to_string());

        // Script value assignment: arguments[0].value = arguments[1]
        if script.contains("arguments[0].value = arguments[1]") {
            let target = args
                .first()
                .and_then(|a| a.get(ELEMENT_KEY))
                .and_then(Value::as_str)
                .map(str::to_string);
            let value = args.get(1).and_then(Value::as_str).unwrap_or_default().to_string();
            if let Some(target) = target {
                if let Some((_, el)) = state.elements.iter_mut().find(|(id, _)| *id == target) {
                    el.value = value;
                }
            }
        }

        Ok(state
            .script_results
            .iter()
            .find(|(fragment, _)| script.contains(fragment.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Null))
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.record("screenshot");
        Ok(self.state().screenshot.clone())
    }

    fn maximize_window(&self) -> Result<(), DriverError> {
        self.record("maximize");
        if self.state().fail_maximize {
            return Err(DriverError::Protocol {
                command: "maximize window".to_string(),
                error: "unsupported operation".to_string(),
                message: "window manager refused".to_string(),
            });
        }
        Ok(())
    }

    fn set_timeouts(&self, implicit: Duration, page_load: Duration) -> Result<(), DriverError> {
        self.record("timeouts");
        let mut state = self.state();
        state.timeouts = Some((implicit, page_load));
        state.implicit = implicit;
        Ok(())
    }

    fn set_implicit_wait(&self, implicit: Duration) -> Result<(), DriverError> {
        self.record(format!("implicit {}ms", implicit.as_millis()));
        self.state().implicit = implicit;
        Ok(())
    }

    fn implicit_wait(&self) -> Duration {
        self.state().implicit
    }

    fn delete_all_cookies(&self) -> Result<(), DriverError> {
        self.record("delete cookies");
        Ok(())
    }

    fn quit(&self) -> Result<(), DriverError> {
        self.record("quit");
        let mut state = self.state();
        state.quit_calls += 1;
        if state.fail_quit {
            return Err(DriverError::Protocol {
                command: "delete session".to_string(),
                error: "invalid session id".to_string(),
                message: "session already gone".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// FakeLauncher: records every session it hands out
// ============================================================================

type Setup = Box<dyn Fn(&FakeBrowser) + Send + Sync>;

pub struct FakeLauncher {
    setup: Setup,
    fail: bool,
    launched: Mutex<Vec<(BrowserKind, bool, FakeBrowser)>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::with_setup(|_| {})
    }

    /// Every launched session is passed to `setup` before it is returned.
    pub fn with_setup(setup: impl Fn(&FakeBrowser) + Send + Sync + 'static) -> Self {
        FakeLauncher {
            setup: Box::new(setup),
            fail: false,
            launched: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        FakeLauncher {
            fail: true,
            ..Self::new()
        }
    }

    pub fn launched(&self) -> Vec<(BrowserKind, bool, FakeBrowser)> {
        self.launched.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn sessions(&self) -> Vec<FakeBrowser> {
        self.launched().into_iter().map(|(_, _, b)| b).collect()
    }
}

impl SessionLauncher for FakeLauncher {
    fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>, DriverError> {
        if self.fail {
            return Err(DriverError::Launch {
                browser: kind.to_string(),
                message: "no driver on PATH".to_string(),
            });
        }
        let mut launched = self.launched.lock().unwrap_or_else(|p| p.into_inner());
        let browser = FakeBrowser::new(&format!("fake-{}", launched.len() + 1));
        (self.setup)(&browser);
        launched.push((kind, headless, browser.clone()));
        Ok(Box::new(browser))
    }
}
