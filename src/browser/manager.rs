use std::sync::Arc;

use tracing::{error, info, warn};

use crate::browser::capabilities::{BrowserKind, SessionPolicy};
use crate::browser::driver::{Browser, DriverError};

/// Creates browser sessions. Shared by all workers of a run.
pub trait SessionLauncher: Send + Sync {
    fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>, DriverError>;
}

// ============================================================================
// DriverManager: one session binding per worker
// ============================================================================

/// Owns at most one browser session for the worker that created it.
///
/// Each worker thread builds its own manager; sessions are never shared
/// across threads. Teardown is idempotent and also runs on drop.
pub struct DriverManager {
    launcher: Arc<dyn SessionLauncher>,
    policy: SessionPolicy,
    session: Option<Box<dyn Browser>>,
}

impl DriverManager {
    pub fn new(launcher: Arc<dyn SessionLauncher>, policy: SessionPolicy) -> Self {
        DriverManager {
            launcher,
            policy,
            session: None,
        }
    }

    /// Start a session for `browser` and bind it to this worker.
    ///
    /// An already bound session is torn down first. If the session policy
    /// cannot be applied the new session is closed and the error returned.
    pub fn initialize(&mut self, browser: &str, headless: bool) -> Result<&dyn Browser, DriverError> {
        if self.session.is_some() {
            warn!("browser session already initialized for this worker; replacing it");
            self.teardown();
        }

        let kind = BrowserKind::parse(browser);
        let session = self.launcher.launch(kind, headless)?;

        if let Err(e) = apply_policy(session.as_ref(), &self.policy) {
            if let Err(quit_err) = session.quit() {
                error!(error = %quit_err, "failed to close session after policy error");
            }
            return Err(e);
        }

        info!(
            session = session.session_id(),
            browser = %kind,
            headless,
            "driver initialized"
        );

        Ok(&**self.session.insert(session))
    }

    /// The bound session, or [`DriverError::NotInitialized`].
    pub fn get(&self) -> Result<&dyn Browser, DriverError> {
        self.session
            .as_deref()
            .ok_or(DriverError::NotInitialized)
    }

    /// Close the bound session, if any. Close failures are logged, never
    /// returned, and the binding is always cleared.
    pub fn teardown(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let id = session.session_id().to_string();
        match session.quit() {
            Ok(()) => info!(session = %id, "driver quit"),
            Err(e) => error!(session = %id, error = %e, "error while quitting driver"),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_policy(session: &dyn Browser, policy: &SessionPolicy) -> Result<(), DriverError> {
    if policy.maximize {
        session.maximize_window()?;
    }
    session.set_timeouts(policy.implicit_wait, policy.page_load_timeout)?;
    if policy.clear_cookies {
        session.delete_all_cookies()?;
    }
    Ok(())
}
