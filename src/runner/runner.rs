use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::browser::manager::SessionLauncher;
use crate::config::Config;
use crate::error::HarnessError;
use crate::report::report_model::{TestResult, TestStatus, TestSuiteReport};
use crate::runner::context::{ScenarioContext, ScenarioLog};
use crate::runner::listener::TestListener;
use crate::runner::scenario::{Scenario, ScenarioKind};

/// Runs scenarios with setup/teardown pairing and listener notification.
///
/// One worker runs at a time unless [`SuiteRunner::with_threads`] asks for
/// more. Every scenario gets its own [`ScenarioContext`] (and so its own
/// browser session) on the worker that runs it.
pub struct SuiteRunner {
    config: Arc<Config>,
    launcher: Arc<dyn SessionLauncher>,
    listeners: Vec<Box<dyn TestListener>>,
    threads: usize,
}

impl SuiteRunner {
    pub fn new(config: Arc<Config>, launcher: Arc<dyn SessionLauncher>) -> Self {
        SuiteRunner {
            config,
            launcher,
            listeners: Vec::new(),
            threads: 1,
        }
    }

    pub fn with_listener(mut self, listener: impl TestListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `scenarios` and collect a report in catalog order.
    pub fn run(&self, suite_name: &str, scenarios: &[Scenario]) -> TestSuiteReport {
        let start = Instant::now();
        for listener in &self.listeners {
            listener.on_suite_start(suite_name, scenarios.len());
        }

        let workers = self.threads.min(scenarios.len()).max(1);
        info!(suite = suite_name, scenarios = scenarios.len(), workers, "running suite");
        let results = if workers == 1 {
            scenarios.iter().map(|s| self.run_one(s)).collect()
        } else {
            self.run_parallel(scenarios, workers)
        };

        let report = TestSuiteReport::from_results(suite_name, results)
            .with_duration(start.elapsed().as_millis());
        for listener in &self.listeners {
            listener.on_suite_finish(&report);
        }
        report
    }

    fn run_parallel(&self, scenarios: &[Scenario], workers: usize) -> Vec<TestResult> {
        let next = AtomicUsize::new(0);
        let collected: Mutex<Vec<(usize, TestResult)>> = Mutex::new(Vec::with_capacity(scenarios.len()));

        thread::scope(|scope| {
            for worker in 0..workers {
                let next = &next;
                let collected = &collected;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(scenario) = scenarios.get(index) else {
                        break;
                    };
                    debug!(worker, scenario = %scenario.full_name(), "worker picked up scenario");
                    let result = self.run_one(scenario);
                    collected
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push((index, result));
                });
            }
        });

        let mut collected = collected
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collected.sort_by_key(|(index, _)| *index);
        collected.into_iter().map(|(_, result)| result).collect()
    }

    /// Setup, body, listener notification, teardown. Teardown always runs.
    pub fn run_one(&self, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        for listener in &self.listeners {
            listener.on_test_start(scenario);
        }

        let mut ctx = match ScenarioContext::new(scenario, self.config.clone(), self.launcher.clone()) {
            Ok(ctx) => ctx,
            Err(e) => {
                let err = HarnessError::from(e);
                for listener in &self.listeners {
                    listener.on_setup_failure(scenario, &err);
                }
                return self.finish(scenario, start, Err(err), ScenarioLog::default());
            }
        };

        let outcome = setup(scenario, &mut ctx).and_then(|()| execute(scenario, &ctx));

        if let Err(ref err) = outcome {
            if !err.is_skip() {
                for listener in &self.listeners {
                    listener.on_test_failure(scenario, &ctx, err);
                }
            }
        }

        let log = ctx.finish();
        self.finish(scenario, start, outcome, log)
    }

    fn finish(
        &self,
        scenario: &Scenario,
        start: Instant,
        outcome: Result<(), HarnessError>,
        log: ScenarioLog,
    ) -> TestResult {
        let elapsed = start.elapsed();
        let (status, message) = match outcome {
            Ok(()) => {
                for listener in &self.listeners {
                    listener.on_test_success(scenario, elapsed);
                }
                (TestStatus::Passed, None)
            }
            Err(HarnessError::Skipped(reason)) => {
                for listener in &self.listeners {
                    listener.on_test_skipped(scenario, &reason);
                }
                (TestStatus::Skipped, Some(reason))
            }
            Err(err) => (TestStatus::Failed, Some(err.to_string())),
        };

        let mut result = TestResult::new(scenario.name, scenario.suite, status);
        result.duration_ms = elapsed.as_millis();
        result.message = message;
        result.steps = log.steps;
        result.parameters = log.parameters;
        result.attachments = log.attachments;
        result
    }
}

fn setup(scenario: &Scenario, ctx: &mut ScenarioContext) -> Result<(), HarnessError> {
    match scenario.kind {
        ScenarioKind::Ui => ctx.start_browser(),
        ScenarioKind::Api => Ok(()),
    }
}

fn execute(scenario: &Scenario, ctx: &ScenarioContext) -> Result<(), HarnessError> {
    match panic::catch_unwind(AssertUnwindSafe(|| (scenario.body)(ctx))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(HarnessError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
