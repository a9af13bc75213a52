//! prow test runner
//!
//! Executes a named test script, gathers its results, logs and artifacts
//! into a results directory and pushes that directory to a GCS bucket for
//! presentation in testgrid:
//!
//! 1. `build_log.txt` receives the script's merged stdout and stderr
//! 2. `--- PASS` / `--- FAIL` lines become JUnit test cases
//! 3. `started.json` and `finished.json` record timestamps and the outcome
//! 4. the directory is copied to `gs://<bucket>/logs/<script>/<build-num>`

mod cli;
mod commands;
mod error;
mod prelude;
mod run;
mod upload;

use clap::Parser;
use cli::Cli;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::handle_run;
use crate::prelude::*;

/// Main entry point for the prow test runner.
///
/// # Examples
///
/// ```bash
/// # Run the KVM integration suite and upload the results of build 1234
/// prow-runner --test hack/jenkins/linux_integration_tests_kvm.sh --build-num 1234
///
/// # Keep results local
/// prow-runner --test ./test.sh --build-num 0 --out-dir /tmp/results --no-upload
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prow_runner=info,prow_config=info,prow_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = handle_run(cli).await;
    if let Err(ref e) = result {
        error!("Error: {}", e);
    }
    result
}
