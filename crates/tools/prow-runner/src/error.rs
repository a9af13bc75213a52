use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] prow_config::error::Error),

    #[error(transparent)]
    Report(#[from] prow_report::error::Error),

    #[error("Test script {0} does not exist")]
    TestScriptMissing(PathBuf),

    #[error("Failed to start test script: {0}")]
    TestSpawn(String),

    #[error("Failed to join task: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Upload to {destination} failed after {attempts} attempts")]
    UploadFailed { destination: String, attempts: u32 },
}
