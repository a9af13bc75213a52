//! Test runner configuration.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

/// Bucket the minikube prow jobs upload to.
pub const DEFAULT_BUCKET: &str = "k8s-minikube-prow";
/// Local directory collecting logs and reports before upload.
pub const DEFAULT_OUT_DIR: &str = "gcs_out";
/// Object storage copy tool.
pub const DEFAULT_UPLOAD_PROGRAM: &str = "gsutil";

/// Runner configuration. Usually loaded from a TOML file, then overridden
/// by command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Bucket receiving the results directory.
    pub bucket: String,
    /// Results directory: logs, status files and `artifacts/`.
    pub out_dir: PathBuf,
    /// Program and leading arguments used to execute the test script.
    /// The script path is appended as the last argument. Add `-x` to trace
    /// the script; trace lines quoting a result marker are scraped too.
    pub interpreter: Vec<String>,
    /// Kill the test script after this many seconds. No limit when absent.
    pub timeout_secs: Option<u64>,
    /// Artifact upload settings.
    pub upload: UploadConfig,
}

/// Artifact upload settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Program invoked as `<program> cp -R <out_dir> <destination>`.
    pub program: String,
    /// Total number of upload attempts, at least one.
    pub attempts: u32,
    /// Delay before the first retry. Doubles on every further retry.
    pub backoff_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            bucket: String::from(DEFAULT_BUCKET),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            interpreter: vec![String::from("bash")],
            timeout_secs: None,
            upload: UploadConfig::default(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            program: String::from(DEFAULT_UPLOAD_PROGRAM),
            attempts: 3,
            backoff_ms: 2000,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded runner configuration from {}", file_path.display());
        Ok(config)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        let config: Self = toml::from_str(value)?;
        config.validate()
    }

    /// Wall-clock limit for the test script.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(self) -> Result<Self> {
        if self.bucket.is_empty() {
            return Err(Error::Invalid(String::from("bucket must not be empty")));
        }
        if self.upload.program.is_empty() {
            return Err(Error::Invalid(String::from(
                "upload.program must not be empty",
            )));
        }
        if self.upload.attempts == 0 {
            return Err(Error::Invalid(String::from(
                "upload.attempts must be at least 1",
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Invalid(String::from(
                "timeout_secs must be greater than 0",
            )));
        }
        Ok(self)
    }
}

impl UploadConfig {
    /// Delay before retry number `retry` (starting at 1).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}
