//! Results upload.
//!
//! The results directory is copied with an external tool (`gsutil` by
//! default). A failed copy is retried with exponential backoff; running out
//! of attempts is an error.

use std::path::Path;

use prow_config::UploadConfig;
use prow_io::runner::{RunEvent, Runner};
use tokio::sync::mpsc::channel;
use tracing::{error, info, warn};

use crate::prelude::*;

/// Remote location for one build's results.
///
/// # Examples
///
/// ```text
/// gs://k8s-minikube-prow/logs/linux_integration_tests/1234
/// ```
pub fn destination(bucket: &str, key: &str, build_num: &str) -> String {
    format!("gs://{bucket}/logs/{key}/{build_num}")
}

/// Copy `source` to `destination`, retrying as configured.
pub async fn upload(config: &UploadConfig, source: &Path, destination: &str) -> Result<()> {
    for attempt in 1..=config.attempts {
        if upload_once(&config.program, source, destination).await {
            info!("Uploaded {} to {destination}", source.display());
            return Ok(());
        }
        if attempt < config.attempts {
            let delay = config.backoff(attempt);
            warn!(
                "Upload attempt {attempt}/{} failed, retrying in {}ms",
                config.attempts,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    error!("Giving up on upload to {destination}");
    Err(Error::UploadFailed {
        destination: destination.to_string(),
        attempts: config.attempts,
    })
}

async fn upload_once(program: &str, source: &Path, destination: &str) -> bool {
    let runner = Runner::new(
        program,
        vec![
            String::from("cp"),
            String::from("-R"),
            source.to_string_lossy().into_owned(),
            destination.to_string(),
        ],
    );
    info!("Running {}", runner.get_full_command());

    let (tx, mut rx) = channel(64);
    let handle = tokio::spawn(async move { runner.run(tx).await });

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::ProcessCreationFailed(err) => {
                error!("Failed to create upload process - {err}")
            }
            RunEvent::ProcessNewOutputLine(line) => info!("{line}"),
            _ => {}
        }
    }

    match handle.await {
        Ok(Some(exit_status)) if exit_status.success() => true,
        Ok(Some(exit_status)) => {
            error!("Upload exit status {exit_status}");
            false
        }
        Ok(None) => false,
        Err(err) => {
            error!("Failed to join upload task - {err}");
            false
        }
    }
}
