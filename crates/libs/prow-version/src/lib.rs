//! Version-identifying linker flags for minikube builds.
//!
//! Reads the pinned Kubernetes revision and tag from `Godeps/Godeps.json`,
//! checks whether the checkout has uncommitted changes and renders the
//! `-X <package>.<field>=<value>` flags the Go linker injects into the
//! vendored `pkg/version` packages.
//!
//! # Usage
//!
//! ```rust
//! use prow_version::{Manifest, TreeState, VersionInfo, KUBERNETES_PACKAGE, VERSION_PACKAGES};
//!
//! let manifest = Manifest::from_json(r#"{
//!     "ImportPath": "k8s.io/minikube",
//!     "Deps": [
//!         { "ImportPath": "k8s.io/kubernetes/pkg/api", "Comment": "v1.8.0", "Rev": "6e937839ac04a38cac63e6a7a306c5d035fe7b0a" }
//!     ]
//! }"#).unwrap();
//!
//! let info = VersionInfo::from_manifest(
//!     &manifest,
//!     KUBERNETES_PACKAGE,
//!     TreeState::Clean,
//!     String::from("2017-10-01T00:00:00Z"),
//! );
//! let flags = info.ldflags(&VERSION_PACKAGES);
//! assert!(flags.contains("pkg/version.gitMinor=8 "));
//! ```

pub mod build_date;
pub mod error;
pub mod ldflags;
pub mod manifest;
pub mod prelude;
pub mod tag;
pub mod tree_state;

pub use build_date::{build_date, build_date_from_env};
pub use ldflags::{KUBERNETES_PACKAGE, VERSION_PACKAGES, VersionInfo};
pub use manifest::{DependencyRecord, Manifest};
pub use tag::{MajorMinor, parse_major_minor};
pub use tree_state::{TreeState, query_tree_state};
