//! docsmoke CLI: run the documentation-site smoke tour.
//!
//! ## Usage
//!
//! ```bash
//! docsmoke                                  # run against the live site
//! docsmoke --base-url https://preview.example.com --pr-number 1234
//! docsmoke --json                           # machine-readable report
//! DOCSMOKE_HEADLESS=0 docsmoke              # headed via the environment
//! RUST_LOG=docsmoke=debug docsmoke          # per-step tracing
//! ```
//!
//! Flags layer over the `DOCSMOKE_*` environment; a flag always wins.

use clap::Parser;
use docsmoke::config::SmokeConfig;
use docsmoke::result::SmokeResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Browser smoke scenario runner for documentation websites
#[derive(Debug, Parser)]
#[command(name = "docsmoke", version, about)]
struct Cli {
    /// Base URL of the site under test
    #[arg(long, env = "DOCSMOKE_BASE_URL")]
    base_url: Option<String>,

    /// Preview-deployment PR number (strips the preview path prefix from
    /// asset URLs before the direct reachability fetch)
    #[arg(long, env = "DOCSMOKE_PR_NUMBER")]
    pr_number: Option<String>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Path to a chromium binary
    #[arg(long, env = "CHROMIUM_PATH")]
    chromium_path: Option<String>,

    /// Polling window for element queries, in milliseconds
    #[arg(long, env = "DOCSMOKE_LOCATOR_TIMEOUT_MS")]
    locator_timeout_ms: Option<u64>,

    /// Emit the run report as JSON instead of the human summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Layer flags over an environment-derived base configuration
    fn into_config(self, base: SmokeConfig) -> SmokeConfig {
        let mut config = base;
        if let Some(url) = self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(pr) = self.pr_number {
            config = config.with_pr_number(pr);
        }
        if self.headed {
            config = config.with_headless(false);
        }
        if let Some(path) = self.chromium_path {
            config = config.with_chromium_path(path);
        }
        if let Some(ms) = self.locator_timeout_ms {
            config = config.with_locator_timeout_ms(ms);
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let base = match SmokeConfig::from_env() {
        Ok(base) => base,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = cli.into_config(base);

    match run(config, json) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "browser")]
fn run(config: SmokeConfig, json: bool) -> SmokeResult<bool> {
    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(docsmoke::scenario::run(&config))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.summary());
    }
    Ok(report.all_passed())
}

#[cfg(not(feature = "browser"))]
fn run(_config: SmokeConfig, _json: bool) -> SmokeResult<bool> {
    Err(docsmoke::result::SmokeError::Config {
        message: "Browser support not compiled in. Rebuild with --features browser".to_string(),
    })
}
