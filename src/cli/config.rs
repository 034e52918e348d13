use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Config, ConfigError};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "fnol-harness",
    version,
    about = "Browser and API test harness for ClaimCenter FNOL workflows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the properties file (default: resources/config.properties,
    /// then config.properties in the current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios from the catalog
    Run {
        /// Only scenarios whose suite starts with this prefix (e.g. ui, api.login)
        #[arg(long)]
        suite: Option<String>,

        /// Only scenarios whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Suite plan YAML file or directory of plan files
        #[arg(long)]
        plan: Option<String>,

        /// Report format
        #[arg(long, value_enum, default_value_t)]
        format: ReportFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Browser override: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,

        /// Environment override (selects base.url.<env>)
        #[arg(long)]
        env: Option<String>,

        /// Run scenarios in parallel on this many workers
        #[arg(long)]
        threads: Option<usize>,
    },

    /// List catalog scenarios
    List {
        /// Only scenarios whose suite starts with this prefix
        #[arg(long)]
        suite: Option<String>,

        /// Only scenarios whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Dump locator candidates (links, buttons, inputs, selects) of a page
    Inspect {
        /// Page to inspect (default: base.url.<env>)
        #[arg(long)]
        url: Option<String>,

        /// Inventory format
        #[arg(long, value_enum, default_value_t)]
        format: InspectFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Browser override: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,
    },
}

/// Report output format, checked at parse time so a bad value never
/// reaches a run.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain-text summary
    #[default]
    Console,
    /// Self-contained HTML page
    Html,
    /// `JUnit` XML
    Junit,
    /// JSON
    Json,
}

/// Element inventory output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load the properties file from `path`, or from the default locations.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => Config::load_from(Path::new(p)),
        None => Config::load(),
    }
}

// ============================================================================
// Config Overrides (merge CLI args over the properties file)
// ============================================================================

/// Property overrides implied by command-line flags.
pub fn build_overrides(
    browser: Option<&str>,
    headless: bool,
    env: Option<&str>,
    threads: Option<usize>,
) -> Vec<(String, String)> {
    let mut overrides = Vec::new();
    if let Some(browser) = browser {
        overrides.push(("browser".to_string(), browser.to_string()));
    }
    if headless {
        overrides.push(("headless".to_string(), "true".to_string()));
    }
    if let Some(env) = env {
        overrides.push(("environment".to_string(), env.to_string()));
    }
    if let Some(threads) = threads {
        overrides.push(("parallel.execution".to_string(), (threads > 1).to_string()));
        overrides.push(("thread.count".to_string(), threads.to_string()));
    }
    overrides
}

/// Log filter for `-v` count when `RUST_LOG` is unset.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,fnol_harness=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
