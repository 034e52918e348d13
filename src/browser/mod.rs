pub mod capabilities;
pub mod driver;
pub mod locator;
pub mod manager;
pub mod webdriver;

pub use capabilities::{BrowserKind, SessionPolicy};
pub use driver::{Browser, DriverError, ElementRef};
pub use locator::Locator;
pub use manager::{DriverManager, SessionLauncher};
