//! Record of compensable steps taken while materializing a project.
//!
//! Every mutation the scaffold service performs is recorded here *before*
//! it is attempted. On failure the journal is unwound in reverse order.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::{
    ApplicationError,
    ports::{Filesystem, VersionControl},
};

/// One compensable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A directory that did not exist before.
    CreatedDirectory(PathBuf),
    /// A file that did not exist before.
    CreatedFile(PathBuf),
    /// A file that was overwritten; `previous` is its old content.
    ReplacedFile { path: PathBuf, previous: Vec<u8> },
    /// `git init` in a directory that had no repository.
    InitializedRepository(PathBuf),
    /// `git add` on a repository that existed before this run.
    Staged(PathBuf),
    /// A commit on a repository that existed before this run.
    Committed(PathBuf),
    /// A remote repository. Never deleted automatically.
    CreatedRemote(String),
}

#[derive(Debug, Default)]
pub struct Journal {
    steps: Vec<Step>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: Step) {
        debug!(?step, "journal");
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of files and directories this run created.
    pub fn created_entries(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::CreatedDirectory(_) | Step::CreatedFile(_)))
            .count()
    }

    /// Undo every recorded step, newest first.
    ///
    /// Best effort: a failing compensation is logged and collected, and the
    /// remaining steps are still attempted.
    pub fn rollback(
        self,
        filesystem: &dyn Filesystem,
        vcs: &dyn VersionControl,
    ) -> Vec<ApplicationError> {
        let mut failures = Vec::new();

        for step in self.steps.into_iter().rev() {
            let outcome = match &step {
                Step::CreatedDirectory(path) => remove_if_present(filesystem, path, true),
                Step::CreatedFile(path) => remove_if_present(filesystem, path, false),
                Step::ReplacedFile { path, previous } => filesystem
                    .write_file(path, previous)
                    .map_err(|e| failure(path, e)),
                Step::InitializedRepository(root) => {
                    remove_if_present(filesystem, &root.join(".git"), true)
                }
                Step::Staged(root) => vcs.unstage_all(root).map_err(|e| failure(root, e)),
                Step::Committed(root) => vcs.undo_last_commit(root).map_err(|e| failure(root, e)),
                Step::CreatedRemote(slug) => {
                    warn!(
                        repository = %slug,
                        "Remote repository was created and is left in place; delete it manually if unwanted"
                    );
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                warn!(error = %e, "Rollback step failed");
                failures.push(e);
            }
        }

        failures
    }
}

fn remove_if_present(
    filesystem: &dyn Filesystem,
    path: &Path,
    directory: bool,
) -> Result<(), ApplicationError> {
    if !filesystem.exists(path) {
        return Ok(());
    }
    let result = if directory {
        filesystem.remove_dir_all(path)
    } else {
        filesystem.remove_file(path)
    };
    result.map_err(|e| failure(path, e))
}

fn failure(path: &Path, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::RollbackFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
