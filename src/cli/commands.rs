use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::browser::capabilities::SessionPolicy;
use crate::browser::manager::{DriverManager, SessionLauncher};
use crate::browser::webdriver::WebDriverLauncher;
use crate::cli::config::{InspectFormat, ReportFormat};
use crate::config::{Config, ConfigError};
use crate::pages::base::Page;
use crate::pages::inspector::{self, ElementInventory};
use crate::report::console::format_console_report;
use crate::report::html::generate_html_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::TestSuiteReport;
use crate::runner::listener::LoggingListener;
use crate::runner::plan::SuitePlan;
use crate::runner::runner::SuiteRunner;
use crate::runner::scenario::Scenario;
use crate::scenarios;

const DEFAULT_SUITE_NAME: &str = "FNOL Harness";

// ============================================================================
// run subcommand
// ============================================================================

/// Run catalog scenarios and return whether none failed.
pub fn cmd_run(
    config: Arc<Config>,
    suite: Option<&str>,
    filter: Option<&str>,
    plan: Option<&str>,
    format: ReportFormat,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let launcher: Arc<dyn SessionLauncher> = Arc::new(WebDriverLauncher::new(config.webdriver_url()));
    let report = run_selection(config, launcher, suite, filter, plan)?;

    let Some(report) = report else {
        warn!(suite, filter, plan, "no scenarios matched");
        return Ok(true);
    };

    let content = render_report(&report, format)?;
    write_output(output, &content)?;
    Ok(report.all_passed())
}

/// Resolve the selection (plans or suite/filter) and run it.
///
/// Returns `None` when nothing matched.
pub fn run_selection(
    config: Arc<Config>,
    launcher: Arc<dyn SessionLauncher>,
    suite: Option<&str>,
    filter: Option<&str>,
    plan: Option<&str>,
) -> Result<Option<TestSuiteReport>, Box<dyn std::error::Error>> {
    let default_threads = default_threads(&config)?;
    let screenshots = config.screenshot_on_failure()?;
    let start = Instant::now();

    let batches: Vec<(String, usize, Vec<Scenario>)> = match plan {
        Some(path) => {
            let catalog = scenarios::all();
            let mut batches = Vec::new();
            for plan in SuitePlan::load_all(Path::new(path))? {
                let selected = plan.select(&catalog)?;
                let selected: Vec<Scenario> = selected
                    .into_iter()
                    .filter(|s| filter.is_none_or(|f| s.matches(f)))
                    .collect();
                batches.push((plan.name.clone(), plan.workers(default_threads), selected));
            }
            batches
        }
        None => vec![(
            suite.unwrap_or(DEFAULT_SUITE_NAME).to_string(),
            default_threads,
            scenarios::select(suite, filter),
        )],
    };

    if batches.iter().all(|(_, _, selected)| selected.is_empty()) {
        return Ok(None);
    }

    let mut reports = Vec::new();
    for (name, threads, selected) in batches {
        if selected.is_empty() {
            warn!(plan = %name, "plan selected no scenarios");
            continue;
        }
        info!(suite = %name, scenarios = selected.len(), threads, "starting suite");
        let runner = SuiteRunner::new(Arc::clone(&config), Arc::clone(&launcher))
            .with_threads(threads)
            .with_listener(LoggingListener::new(screenshots));
        reports.push(runner.run(&name, &selected));
    }

    Ok(Some(merge_reports(reports, start.elapsed().as_millis())))
}

/// Worker count from `parallel.execution` / `thread.count`.
fn default_threads(config: &Config) -> Result<usize, ConfigError> {
    if config.parallel_execution()? {
        Ok(config.thread_count()?.max(1))
    } else {
        Ok(1)
    }
}

fn merge_reports(mut reports: Vec<TestSuiteReport>, duration_ms: u128) -> TestSuiteReport {
    if reports.len() == 1 {
        let report = reports.remove(0);
        return report.with_duration(duration_ms);
    }
    let name = reports
        .iter()
        .map(|r| r.suite_name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    let results = reports.into_iter().flat_map(|r| r.test_results).collect();
    TestSuiteReport::from_results(&name, results).with_duration(duration_ms)
}

/// Format a report as console text, HTML, JUnit XML or JSON.
pub fn render_report(report: &TestSuiteReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    let content = match format {
        ReportFormat::Html => generate_html_report(report),
        ReportFormat::Junit => generate_junit_xml(report),
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Console => format_console_report(report),
    };
    Ok(content)
}

// ============================================================================
// list subcommand
// ============================================================================

pub fn cmd_list(suite: Option<&str>, filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let selected = scenarios::select(suite, filter);
    if selected.is_empty() {
        warn!(suite, filter, "no scenarios matched");
        return Ok(());
    }
    print!("{}", format_listing(&selected));
    Ok(())
}

pub fn format_listing(scenarios: &[Scenario]) -> String {
    let width = scenarios
        .iter()
        .map(|s| s.full_name().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for s in scenarios {
        out.push_str(&format!(
            "[{:<3}] {:<width$}  {}\n",
            s.kind.to_string(),
            s.full_name(),
            s.description,
            width = width
        ));
    }
    out.push_str(&format!("{} scenarios\n", scenarios.len()));
    out
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(
    config: Arc<Config>,
    url: Option<&str>,
    format: InspectFormat,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let launcher: Arc<dyn SessionLauncher> = Arc::new(WebDriverLauncher::new(config.webdriver_url()));
    let inventory = inspect_page(&config, launcher, url)?;

    let content = match format {
        InspectFormat::Json => serde_json::to_string_pretty(&inventory)?,
        InspectFormat::Text => inventory.to_string(),
    };
    write_output(output, &content)
}

/// Open a session, load `url` (or the configured base URL) and collect the
/// element inventory. The session is closed on every path.
pub fn inspect_page(
    config: &Config,
    launcher: Arc<dyn SessionLauncher>,
    url: Option<&str>,
) -> Result<ElementInventory, Box<dyn std::error::Error>> {
    let target = match url.or(config.base_url()) {
        Some(target) if !target.is_empty() => target.to_string(),
        _ => return Err(ConfigError::Missing(format!("base.url.{}", config.environment())).into()),
    };

    let mut driver = DriverManager::new(launcher, SessionPolicy::from_config(config)?);
    let explicit_wait = config.explicit_wait()?;
    let inventory = (|| -> Result<ElementInventory, Box<dyn std::error::Error>> {
        let browser = driver.initialize(config.browser(), config.headless()?)?;
        let page = Page::new(browser, explicit_wait);
        info!(url = %target, "inspecting page");
        page.navigate(&target)?;
        Ok(inspector::inventory(&page)?)
    })();
    driver.teardown();
    inventory
}

// ============================================================================
// Helpers
// ============================================================================

fn write_output(output: Option<&str>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            info!(path, "report written");
        }
        None => print!("{}", content),
    }
    Ok(())
}
