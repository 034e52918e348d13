pub mod assert;
pub mod context;
pub mod listener;
pub mod plan;
pub mod runner;
pub mod scenario;

pub use context::{ScenarioContext, ScenarioLog};
pub use listener::{LoggingListener, TestListener};
pub use plan::{PlanError, SuitePlan};
pub use runner::SuiteRunner;
pub use scenario::{Scenario, ScenarioKind};
