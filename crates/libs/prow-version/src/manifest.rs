//! `Godeps/Godeps.json` dependency manifest.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A pinned dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DependencyRecord {
    /// Go import path, e.g. `k8s.io/kubernetes/pkg/api`.
    pub import_path: String,
    /// Human-readable version, usually the tag (`v1.8.0`). Not every
    /// dependency has one.
    #[serde(default)]
    pub comment: String,
    /// Pinned commit hash.
    #[serde(default)]
    pub rev: String,
}

/// Dependency lock file. Keys other than the ones below are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    #[serde(default)]
    pub import_path: String,
    #[serde(default)]
    pub go_version: Option<String>,
    pub deps: Vec<DependencyRecord>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_json(&contents)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }

    /// First dependency whose import path starts with `package`.
    pub fn find_dependency(&self, package: &str) -> Option<&DependencyRecord> {
        self.deps
            .iter()
            .find(|dep| dep.import_path.starts_with(package))
    }
}
