//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stackgen-adapters` crate provides implementations.

use crate::domain::RepositoryRequest;
use crate::error::ScaffoldResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stackgen_adapters::filesystem::LocalFilesystem` (production)
/// - `stackgen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()>;

    /// Create an empty file if it does not exist. Existing content is kept.
    fn touch(&self, path: &Path) -> ScaffoldResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &[u8]) -> ScaffoldResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> ScaffoldResult<Vec<u8>>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> ScaffoldResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ScaffoldResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ScaffoldResult<()>;
}

/// Port for the version-control client.
///
/// Implemented by:
/// - `stackgen_adapters::vcs::GitCommand` (shells out to `git`)
/// - `stackgen_adapters::recording::RecordingVersionControl` (testing)
///
/// Commit identity is configured on the adapter, not passed per call.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Fail with `ToolMissing` if the client cannot be run.
    fn ensure_available(&self) -> ScaffoldResult<()>;

    /// Create an empty repository in `root`.
    fn init(&self, root: &Path) -> ScaffoldResult<()>;

    /// Stage every change under `root`.
    fn stage_all(&self, root: &Path) -> ScaffoldResult<()>;

    /// Reset the index to `HEAD` (or to empty on an unborn branch).
    /// The working tree is left alone.
    fn unstage_all(&self, root: &Path) -> ScaffoldResult<()>;

    /// Whether `root` has uncommitted changes (staged, unstaged, or untracked).
    fn has_pending_changes(&self, root: &Path) -> ScaffoldResult<bool>;

    /// Commit what is staged.
    fn commit(&self, root: &Path, message: &str, allow_empty: bool) -> ScaffoldResult<()>;

    /// Drop the last commit. Its changes stay in the working tree, unstaged.
    fn undo_last_commit(&self, root: &Path) -> ScaffoldResult<()>;

    /// Whether `remote` is configured in the repository at `root`.
    fn has_remote(&self, root: &Path, remote: &str) -> ScaffoldResult<bool>;

    /// Rename the current branch.
    fn rename_branch(&self, root: &Path, branch: &str) -> ScaffoldResult<()>;

    /// Push `branch` to `remote`, optionally recording it as upstream.
    fn push(&self, root: &Path, remote: &str, branch: &str, set_upstream: bool)
    -> ScaffoldResult<()>;
}

/// Port for the repository-hosting client.
///
/// Implemented by:
/// - `stackgen_adapters::host::GitHubCli` (shells out to `gh`)
/// - `stackgen_adapters::recording::RecordingRepositoryHost` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryHost: Send + Sync {
    /// Fail with `ToolMissing` if the client cannot be run.
    fn ensure_available(&self) -> ScaffoldResult<()>;

    /// Create the remote repository using `root` as its source, register it
    /// as `request.remote`, and push the current branch.
    fn create_repository(&self, root: &Path, request: &RepositoryRequest) -> ScaffoldResult<()>;
}
