//! Test script execution.
//!
//! Runs the script once and consumes its merged output line by line, in the
//! order it is produced. Every line is appended to `build_log.txt`, echoed to
//! stdout and handed to the classifier; nothing else is kept in memory.

use std::path::Path;

use prow_config::RunnerConfig;
use prow_io::runner::{RunEvent, Runner};
use prow_report::{Classifier, FinalReport, ResultsDir, RunReport, epoch_now};
use tokio::sync::mpsc::channel;
use tracing::{error, info, warn};

use crate::prelude::*;

/// Build the runner for `script`: the configured interpreter followed by the
/// script path, or the script itself when no interpreter is configured.
fn script_runner(script: &Path, config: &RunnerConfig) -> Runner {
    let script = script.to_string_lossy().into_owned();
    let runner = match config.interpreter.split_first() {
        Some((program, args)) => {
            let mut args = args.to_vec();
            args.push(script);
            Runner::new(program.clone(), args)
        }
        None => Runner::new_without_args(script),
    };
    runner.with_timeout(config.timeout())
}

/// Run the test script and collect its results.
///
/// The returned report carries the script's real exit code, or none when the
/// script was killed after the configured timeout.
pub async fn run_tests(
    script: &Path,
    config: &RunnerConfig,
    results: &ResultsDir,
) -> Result<FinalReport> {
    let classifier = Classifier::for_script(script);
    let mut build_log = results.create_build_log()?;
    let mut report = RunReport::start(epoch_now());

    let runner = script_runner(script, config);
    info!("Running {}", runner.get_full_command());

    let (tx, mut rx) = channel(256);
    let handle = tokio::spawn(async move { runner.run(tx).await });

    let mut spawn_error = None;
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::ProcessCreationFailed(err) => {
                error!("Failed to create test process - {err}");
                spawn_error = Some(err);
            }
            RunEvent::ProcessCreated => info!("{} started", classifier.class_name()),
            RunEvent::ProcessNewOutputLine(line) | RunEvent::ProcessNewErrorLine(line) => {
                if let Err(err) = build_log.append(&line) {
                    // Dropping the runner future kills the script
                    handle.abort();
                    return Err(err.into());
                }
                println!("{line}");
                if let Some(result) = classifier.classify(&line) {
                    report.push(result);
                }
            }
            RunEvent::ProcessTimedOut(timeout) => {
                error!(
                    "{} killed after {}s",
                    classifier.class_name(),
                    timeout.as_secs()
                );
            }
            RunEvent::ProcessEnd(success) => {
                if success {
                    info!("{} ended successfully", classifier.class_name());
                } else {
                    warn!("{} failed", classifier.class_name());
                }
            }
        }
    }

    let exit_status = handle.await?;
    build_log.finish()?;

    if let Some(err) = spawn_error {
        return Err(Error::TestSpawn(err));
    }

    if let Some(exit_status) = exit_status {
        info!("Test script exit status {exit_status}");
    }
    let exit_code = exit_status.and_then(|status| status.code());
    Ok(report.finish(epoch_now(), exit_code))
}
