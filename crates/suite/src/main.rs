//! SauceDemo E2E Runner
//!
//! Runs the browser and API suites against the storefront and writes the
//! list, JSON and Allure reports.
//!
//! Exit status: 0 when every test met its expectation, 1 when tests failed,
//! 2 when the run could not be carried out.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use saucedemo_common::SuiteConfig;
use saucedemo_e2e::{
    runner, target, AllureReporter, DriverConfig, JsonReporter, ListReporter, PlaywrightLauncher,
    RunOptions, TestRunner,
};

mod projects;
mod specs;

const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "saucedemo-e2e")]
#[command(about = "End-to-end tests for the SauceDemo storefront")]
#[command(version)]
struct Cli {
    /// Configuration file; missing files fall back to defaults
    #[arg(short, long, env = "SAUCEDEMO_CONFIG", default_value = "saucedemo.toml")]
    config: PathBuf,

    /// Run only these projects (repeatable); dependencies are added
    #[arg(short, long = "project")]
    projects: Vec<String>,

    /// Only run tests whose "<suite> <title>" matches this regex
    #[arg(short, long)]
    grep: Option<String>,

    /// Parallel workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Retries for failing tests
    #[arg(long)]
    retries: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Browser engine: chromium, firefox or webkit
    #[arg(long)]
    browser: Option<String>,

    /// Storefront origin
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for screenshots, traces and test-results.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not wait for the storefront before starting
    #[arg(long)]
    skip_preflight: bool,

    /// Print the selected tests without running them
    #[arg(long)]
    list: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then the environment, then flags
    fn suite_config(&self) -> anyhow::Result<SuiteConfig> {
        let mut config = SuiteConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        config.apply_env()?;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(browser) = &self.browser {
            config.browser = browser.parse()?;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn run_options(&self, config: &SuiteConfig) -> anyhow::Result<RunOptions> {
        let mut options = RunOptions::from_config(config);
        options.projects = self.projects.clone();
        if let Some(pattern) = &self.grep {
            options = options.grep(pattern)?;
        }
        Ok(options)
    }
}

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    tokio::select! {
        result = run(&cli) => match result {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(2)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the run succeeded
async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.suite_config()?;
    let options = cli.run_options(&config)?;
    let projects = projects::all(&config);

    if cli.list {
        let planned = runner::list(&projects, &options)?;
        for test in &planned {
            println!("[{}] › {} › {}", test.project, test.suite, test.title);
        }
        println!("Total: {} test(s)", planned.len());
        return Ok(true);
    }

    info!(
        "SauceDemo E2E v{} against {} ({}, {})",
        saucedemo_common::VERSION,
        config.base_url,
        config.browser.as_str(),
        if config.headless { "headless" } else { "headed" }
    );

    if cli.skip_preflight {
        info!("Skipping preflight");
    } else {
        target::wait_until_reachable(&config.url("/"), PREFLIGHT_TIMEOUT).await?;
    }

    let launcher = Arc::new(PlaywrightLauncher::new(DriverConfig::from_suite(&config)));
    let runner = TestRunner::new(launcher, options)
        .with_reporter(ListReporter)
        .with_reporter(JsonReporter::new(&config.output_dir))
        .with_reporter(AllureReporter::new(&config.allure_dir));

    let report = runner.run(projects).await?;
    Ok(report.success())
}
