use thiserror::Error;

use crate::api::ApiError;
use crate::browser::DriverError;
use crate::config::ConfigError;
use crate::fixtures::FixtureError;
use crate::pages::PageError;
use crate::wait::WaitError;

/// Everything a scenario body can fail with.
///
/// `Skipped` is not a failure: the runner reports it with its reason.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("skipped: {0}")]
    Skipped(String),

    #[error("scenario panicked: {0}")]
    Panicked(String),
}

impl HarnessError {
    pub fn is_skip(&self) -> bool {
        matches!(self, HarnessError::Skipped(_))
    }
}
