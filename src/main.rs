use std::sync::Arc;

use clap::Parser;
use fnol_harness::cli::commands::{cmd_inspect, cmd_list, cmd_run};
use fnol_harness::cli::config::{Cli, Commands, build_overrides, load_config, log_level};
use tracing::debug;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level(cli.verbose))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Listing needs no properties file
    if let Commands::List { suite, filter } = &cli.command {
        return cmd_list(suite.as_deref(), filter.as_deref());
    }

    let config = load_config(cli.config.as_deref())?;

    // Resolve settings: CLI flags > properties file
    let overrides = match &cli.command {
        Commands::Run {
            browser,
            headless,
            env,
            threads,
            ..
        } => build_overrides(browser.as_deref(), *headless, env.as_deref(), *threads),
        Commands::Inspect { browser, headless, .. } => {
            build_overrides(browser.as_deref(), *headless, None, None)
        }
        Commands::List { .. } => Vec::new(),
    };
    let config = Arc::new(config.with_overrides(overrides));
    for (key, value) in config.entries() {
        let value = if key.contains("password") { "****" } else { value };
        debug!(key, value, "config");
    }

    match cli.command {
        Commands::Run {
            suite,
            filter,
            plan,
            format,
            output,
            ..
        } => {
            let all_passed = cmd_run(
                config,
                suite.as_deref(),
                filter.as_deref(),
                plan.as_deref(),
                format,
                output.as_deref(),
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::List { .. } => {}
        Commands::Inspect { url, format, output, .. } => {
            cmd_inspect(config, url.as_deref(), format, output.as_deref())?;
        }
    }

    Ok(())
}
