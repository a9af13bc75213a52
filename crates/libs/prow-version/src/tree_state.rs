//! Working tree cleanliness as reported by `git status`.

use std::{fmt, path::Path};

use prow_io::runner::{RunEvent, Runner};
use tokio::sync::mpsc::channel;
use tracing::debug;

use crate::prelude::*;

/// Whether the checkout has uncommitted modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    Dirty,
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeState::Clean => write!(f, "clean"),
            TreeState::Dirty => write!(f, "dirty"),
        }
    }
}

impl TreeState {
    /// Derive the state from `git status --porcelain` output: any entry,
    /// untracked files included, makes the tree dirty.
    pub fn from_porcelain<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        if lines.into_iter().any(|line| !line.trim().is_empty()) {
            TreeState::Dirty
        } else {
            TreeState::Clean
        }
    }
}

/// Run `git status --porcelain` in `repo` and classify the result.
///
/// Only stdout is classified. Warnings and traces git prints on stderr are
/// logged and otherwise ignored.
pub async fn query_tree_state(repo: &Path) -> Result<TreeState> {
    let runner = Runner::new(
        "git",
        vec![
            String::from("-C"),
            repo.to_string_lossy().into_owned(),
            String::from("status"),
            String::from("--porcelain"),
        ],
    )
    .with_separate_stderr();
    let command = runner.get_full_command();
    debug!("Running {command}");

    let (tx, mut rx) = channel(64);
    let handle = tokio::spawn(async move { runner.run(tx).await });

    let mut lines = Vec::new();
    let mut errors = Vec::new();
    let mut spawn_error = None;
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::ProcessNewOutputLine(line) => lines.push(line),
            RunEvent::ProcessNewErrorLine(line) => {
                debug!("git: {line}");
                errors.push(line);
            }
            RunEvent::ProcessCreationFailed(err) => spawn_error = Some(err),
            _ => {}
        }
    }

    let exit_status = handle
        .await
        .map_err(|err| Error::GitStatus(format!("{command}: {err}")))?;
    let exit_status = match (exit_status, spawn_error) {
        (Some(status), _) => status,
        (None, Some(err)) => return Err(Error::GitStatus(err)),
        (None, None) => {
            return Err(Error::GitStatus(format!("{command}: no exit status")));
        }
    };

    if !exit_status.success() {
        return Err(Error::GitStatus(format!(
            "{command} exited with {exit_status}: {}",
            errors.join(" ")
        )));
    }

    Ok(TreeState::from_porcelain(lines.iter().map(String::as_str)))
}
