pub mod model;
pub mod reader;

pub use reader::{FixtureError, FixtureReader};
