//! Browser and API test harness for ClaimCenter FNOL (first notice of loss)
//! workflows and the login API.

pub mod api;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod pages;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod wait;

pub use error::HarnessError;
