use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::browser::capabilities::SessionPolicy;
use crate::browser::driver::Browser;
use crate::browser::manager::{DriverManager, SessionLauncher};
use crate::config::{Config, ConfigError};
use crate::error::HarnessError;
use crate::fixtures::FixtureReader;
use crate::pages::Page;
use crate::report::attachments::{Attachment, AttachmentRef, AttachmentStore};
use crate::runner::scenario::Scenario;

/// Steps, parameters and attachments recorded while a scenario runs.
#[derive(Debug, Clone, Default)]
pub struct ScenarioLog {
    pub steps: Vec<String>,
    pub parameters: BTreeMap<String, String>,
    pub attachments: Vec<AttachmentRef>,
}

// ============================================================================
// ScenarioContext: everything a scenario body can reach
// ============================================================================

/// Per-scenario state owned by the worker running it.
///
/// Holds the worker's [`DriverManager`], the shared configuration and the
/// fixture reader. Recording methods take `&self` so a body can keep a page
/// object borrowed from the context while it logs steps.
pub struct ScenarioContext {
    scenario: String,
    config: Arc<Config>,
    fixtures: FixtureReader,
    driver: DriverManager,
    store: AttachmentStore,
    log: RefCell<ScenarioLog>,
}

impl ScenarioContext {
    pub fn new(
        scenario: &Scenario,
        config: Arc<Config>,
        launcher: Arc<dyn SessionLauncher>,
    ) -> Result<Self, ConfigError> {
        let policy = SessionPolicy::from_config(&config)?;
        Ok(ScenarioContext {
            scenario: scenario.full_name(),
            fixtures: FixtureReader::new(config.test_data_dir()),
            store: AttachmentStore::new(&config.results_dir()),
            driver: DriverManager::new(launcher, policy),
            config,
            log: RefCell::new(ScenarioLog::default()),
        })
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fixtures(&self) -> &FixtureReader {
        &self.fixtures
    }

    pub fn driver(&self) -> &DriverManager {
        &self.driver
    }

    // ------------------------------------------------------------------
    // Browser lifecycle (runner only)
    // ------------------------------------------------------------------

    /// Launch the configured browser and open the base URL when one is set.
    pub fn start_browser(&mut self) -> Result<(), HarnessError> {
        let browser = self.config.browser().to_string();
        let headless = self.config.headless()?;
        info!(
            scenario = %self.scenario,
            %browser,
            headless,
            environment = self.config.environment(),
            "setting up browser"
        );

        self.parameter("Browser", &browser);
        self.parameter("Environment", self.config.environment());
        let base_url = self.config.base_url().unwrap_or_default().to_string();
        self.parameter("Base URL", &base_url);

        let session = self.driver.initialize(&browser, headless)?;
        if !base_url.is_empty() {
            info!(url = %base_url, "navigating to base URL");
            session.navigate(&base_url)?;
        }
        Ok(())
    }

    pub fn stop_browser(&mut self) {
        if self.driver.is_initialized() {
            info!(scenario = %self.scenario, "tearing down browser");
        }
        self.driver.teardown();
    }

    // ------------------------------------------------------------------
    // Accessors used by scenario bodies
    // ------------------------------------------------------------------

    pub fn browser(&self) -> Result<&dyn Browser, HarnessError> {
        Ok(self.driver.get()?)
    }

    /// Page helper over the bound session using `explicit.wait`.
    pub fn page(&self) -> Result<Page<'_>, HarnessError> {
        let timeout = self.config.explicit_wait()?;
        Ok(Page::new(self.browser()?, timeout))
    }

    /// Fresh client for the environment's API base URL.
    pub fn api_client(&self) -> Result<ApiClient, HarnessError> {
        Ok(ApiClient::from_config(&self.config)?)
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    pub fn step(&self, description: &str) {
        info!(scenario = %self.scenario, "step: {}", description);
        self.log.borrow_mut().steps.push(description.to_string());
    }

    pub fn parameter(&self, name: &str, value: &str) {
        debug!(scenario = %self.scenario, name, value, "parameter");
        self.log
            .borrow_mut()
            .parameters
            .insert(name.to_string(), value.to_string());
    }

    /// Store an attachment. A write failure is logged and the attachment dropped.
    pub fn attach(&self, attachment: Attachment) -> Option<AttachmentRef> {
        match self.store.store(&attachment) {
            Ok(reference) => {
                self.log.borrow_mut().attachments.push(reference.clone());
                Some(reference)
            }
            Err(e) => {
                warn!(name = %attachment.name, error = %e, "could not store attachment");
                None
            }
        }
    }

    pub fn attach_text(&self, name: &str, content: &str) -> Option<AttachmentRef> {
        self.attach(Attachment::text(name, content))
    }

    pub fn attach_json(&self, name: &str, value: &Value) -> Option<AttachmentRef> {
        self.attach(Attachment::json(name, value))
    }

    /// Screenshot of the bound session named `<label>_<yyyyMMdd_HHmmss>`.
    pub fn capture_screenshot(&self, label: &str) -> Result<AttachmentRef, HarnessError> {
        let png = self.browser()?.screenshot()?;
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let attachment = Attachment::png(&format!("{}_{}", label, timestamp), png);
        let reference = self.store.store(&attachment)?;
        info!(name = %reference.name, path = %reference.path.display(), "screenshot captured");
        self.log.borrow_mut().attachments.push(reference.clone());
        Ok(reference)
    }

    pub fn log(&self) -> ScenarioLog {
        self.log.borrow().clone()
    }

    /// Tear down and hand back the recorded log.
    pub fn finish(mut self) -> ScenarioLog {
        self.stop_browser();
        std::mem::take(self.log.get_mut())
    }
}
