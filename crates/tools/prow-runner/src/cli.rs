//! Command-line interface for the prow test runner.

use clap::Parser;
use prow_config::RunnerConfig;
use std::path::PathBuf;

/// Command-line interface for the prow test runner.
#[derive(Parser, Debug)]
#[command(name = "prow-runner")]
#[command(about = "Run tests and upload results to a GCS bucket")]
#[command(override_usage = "prow-runner --test path/to/test.sh --build-num <BUILD_NUM>")]
pub struct Cli {
    /// Full path to the test script to run
    #[arg(long)]
    pub test: PathBuf,

    /// Build number used in the upload destination
    #[arg(long = "build-num", visible_alias = "buildnum")]
    pub build_num: String,

    /// Name of the GCS bucket to upload to [default: k8s-minikube-prow]
    #[arg(long)]
    pub bucket: Option<String>,

    /// Directory to store all results, artifacts and logs [default: gcs_out]
    #[arg(long = "out-dir", visible_alias = "outdir")]
    pub out_dir: Option<PathBuf>,

    /// Path to a TOML runner configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Kill the test script after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Write the results locally without uploading them
    #[arg(long)]
    pub no_upload: bool,
}

impl Cli {
    /// Override configuration values with the flags given on the command line.
    pub fn apply(&self, mut config: RunnerConfig) -> RunnerConfig {
        if let Some(bucket) = &self.bucket {
            config.bucket = bucket.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        config
    }
}
