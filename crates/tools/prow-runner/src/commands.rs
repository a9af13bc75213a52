//! Top-level run handler: configure, run, report, upload.

use prow_config::RunnerConfig;
use prow_report::{ResultsDir, class_name};
use tracing::info;

use crate::cli::Cli;
use crate::prelude::*;
use crate::run::run_tests;
use crate::upload::{destination, upload};

/// Handles a full runner invocation.
///
/// The test outcome is recorded in `finished.json`; only configuration, I/O
/// and upload failures make this return an error.
pub async fn handle_run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RunnerConfig::from_file(path)?,
        None => RunnerConfig::default(),
    };
    let config = cli.apply(config);

    if !cli.test.is_file() {
        return Err(Error::TestScriptMissing(cli.test));
    }

    let results = ResultsDir::new(&config.out_dir);
    results.prepare()?;

    let report = run_tests(&cli.test, &config, &results).await?;
    results.write_report(&report)?;
    info!(
        "Result {}: {} tests, {} failures",
        report.outcome(),
        report.results().len(),
        report.failures()
    );

    if cli.no_upload {
        info!("Upload skipped, results kept in {}", results.root().display());
        return Ok(());
    }

    let destination = destination(&config.bucket, &class_name(&cli.test), &cli.build_num);
    upload(&config.upload, results.root(), &destination).await
}
