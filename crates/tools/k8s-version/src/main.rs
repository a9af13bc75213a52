//! Kubernetes version stamping for minikube builds.
//!
//! Prints the `-X` flags passed to `go build -ldflags` so that the vendored
//! Kubernetes and client-go `pkg/version` packages report the pinned
//! Kubernetes release, or just that release with `--k8s-version-only`.
//!
//! ```bash
//! go build -ldflags "$(k8s-version)" ./cmd/minikube
//! ```

mod cli;
mod error;
mod prelude;

use clap::Parser;
use cli::Cli;
use prow_version::{
    Manifest, VERSION_PACKAGES, VersionInfo, build_date_from_env, query_tree_state,
};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::prelude::*;

async fn handle_print(cli: Cli) -> Result<()> {
    let manifest = Manifest::from_file(&cli.manifest)?;

    if cli.k8s_version_only {
        let version = manifest
            .find_dependency(&cli.package)
            .map(|dep| dep.comment.as_str())
            .unwrap_or_default();
        println!("{version}");
        return Ok(());
    }

    let build_date = build_date_from_env()?;
    let tree_state = query_tree_state(&cli.repo).await?;
    let info = VersionInfo::from_manifest(&manifest, &cli.package, tree_state, build_date);
    println!("{}", info.ldflags(&VERSION_PACKAGES));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "k8s_version=warn,prow_version=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = handle_print(cli).await;
    if let Err(ref e) = result {
        error!("Error: {}", e);
    }
    result
}
