#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Version(#[from] prow_version::error::Error),
}
