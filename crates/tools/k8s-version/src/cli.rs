use clap::Parser;
use prow_version::KUBERNETES_PACKAGE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "k8s-version")]
#[command(about = "Print Go linker flags stamping the vendored Kubernetes version")]
pub struct Cli {
    /// Print only the Kubernetes version tag
    #[arg(long)]
    pub k8s_version_only: bool,

    /// Path to the dependency manifest
    #[arg(long, default_value = "Godeps/Godeps.json")]
    pub manifest: PathBuf,

    /// Repository whose working tree state is reported
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Import path prefix of the dependency carrying the version
    #[arg(long, default_value = KUBERNETES_PACKAGE)]
    pub package: String,
}
