//! Configuration management for the prow test runner.
//!
//! Every key is optional; a missing file section falls back to the defaults
//! used by the minikube prow jobs.
//!
//! # Usage
//!
//! ```rust
//! use prow_config::RunnerConfig;
//!
//! let config = RunnerConfig::from_toml(r#"
//!     bucket = "my-bucket"
//!
//!     [upload]
//!     attempts = 5
//! "#).unwrap();
//!
//! assert_eq!(config.bucket, "my-bucket");
//! assert_eq!(config.out_dir.to_str(), Some("gcs_out"));
//! assert_eq!(config.upload.attempts, 5);
//! ```

pub mod error;
pub mod prelude;
pub mod runner_config;

pub use runner_config::{RunnerConfig, UploadConfig};
