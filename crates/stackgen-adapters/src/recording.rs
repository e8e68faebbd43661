//! Recording adapters for tests and dry runs.
//!
//! They log every call instead of running external tools, and can be told
//! to fail a named operation to exercise error paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stackgen_core::{
    application::{
        ApplicationError,
        ports::{RepositoryHost, VersionControl},
    },
    domain::RepositoryRequest,
    error::ScaffoldResult,
};

/// One call made against a recording adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Init(PathBuf),
    StageAll(PathBuf),
    UnstageAll(PathBuf),
    Commit { message: String, allow_empty: bool },
    UndoLastCommit(PathBuf),
    RenameBranch(String),
    Push { remote: String, branch: String, set_upstream: bool },
    CreateRepository(RepositoryRequest),
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<RecordedCall>,
    fail_on: Option<&'static str>,
    missing: bool,
    pending_changes: bool,
    remotes: BTreeSet<String>,
}

/// Shared handle; clones see the same call log.
#[derive(Debug, Clone, Default)]
struct Shared(Arc<Mutex<Recorder>>);

impl Shared {
    fn record(&self, operation: &'static str, tool: &'static str, call: RecordedCall) -> ScaffoldResult<()> {
        let mut recorder = self.0.lock().map_err(|_| ApplicationError::LockPoisoned)?;
        if recorder.fail_on == Some(operation) {
            return Err(ApplicationError::ExternalTool {
                tool,
                command: format!("{tool} {operation}"),
                details: "simulated failure".into(),
            }
            .into());
        }
        recorder.calls.push(call);
        Ok(())
    }

    fn available(&self, tool: &'static str) -> ScaffoldResult<()> {
        let recorder = self.0.lock().map_err(|_| ApplicationError::LockPoisoned)?;
        if recorder.missing {
            return Err(ApplicationError::ToolMissing {
                tool,
                reason: "not installed".into(),
            }
            .into());
        }
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Recorder)) {
        if let Ok(mut recorder) = self.0.lock() {
            f(&mut recorder);
        }
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.0
            .lock()
            .map(|r| r.calls.clone())
            .unwrap_or_default()
    }
}

/// [`VersionControl`] that records calls instead of running `git`.
#[derive(Debug, Clone, Default)]
pub struct RecordingVersionControl {
    shared: Shared,
}

impl RecordingVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the named operation (`init`, `stage_all`, `commit`, `push`, ...).
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.shared.update(|r| r.fail_on = Some(operation));
        self
    }

    /// Report the client as not installed.
    pub fn missing(self) -> Self {
        self.shared.update(|r| r.missing = true);
        self
    }

    /// Value returned by `has_pending_changes`.
    pub fn with_pending_changes(self, pending: bool) -> Self {
        self.shared.update(|r| r.pending_changes = pending);
        self
    }

    /// Report `remote` as already configured.
    pub fn with_remote(self, remote: &str) -> Self {
        self.shared.update(|r| {
            r.remotes.insert(remote.to_string());
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.calls()
    }
}

impl VersionControl for RecordingVersionControl {
    fn ensure_available(&self) -> ScaffoldResult<()> {
        self.shared.available("git")
    }

    fn init(&self, root: &Path) -> ScaffoldResult<()> {
        self.shared
            .record("init", "git", RecordedCall::Init(root.to_path_buf()))
    }

    fn stage_all(&self, root: &Path) -> ScaffoldResult<()> {
        self.shared
            .record("stage_all", "git", RecordedCall::StageAll(root.to_path_buf()))
    }

    fn unstage_all(&self, root: &Path) -> ScaffoldResult<()> {
        self.shared.record(
            "unstage_all",
            "git",
            RecordedCall::UnstageAll(root.to_path_buf()),
        )
    }

    fn has_pending_changes(&self, _root: &Path) -> ScaffoldResult<bool> {
        let recorder = self.shared.0.lock().map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(recorder.pending_changes)
    }

    fn commit(&self, _root: &Path, message: &str, allow_empty: bool) -> ScaffoldResult<()> {
        self.shared.record(
            "commit",
            "git",
            RecordedCall::Commit {
                message: message.to_string(),
                allow_empty,
            },
        )
    }

    fn undo_last_commit(&self, root: &Path) -> ScaffoldResult<()> {
        self.shared.record(
            "undo_last_commit",
            "git",
            RecordedCall::UndoLastCommit(root.to_path_buf()),
        )
    }

    fn has_remote(&self, _root: &Path, remote: &str) -> ScaffoldResult<bool> {
        let recorder = self.shared.0.lock().map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(recorder.remotes.contains(remote))
    }

    fn rename_branch(&self, _root: &Path, branch: &str) -> ScaffoldResult<()> {
        self.shared.record(
            "rename_branch",
            "git",
            RecordedCall::RenameBranch(branch.to_string()),
        )
    }

    fn push(
        &self,
        _root: &Path,
        remote: &str,
        branch: &str,
        set_upstream: bool,
    ) -> ScaffoldResult<()> {
        self.shared.record(
            "push",
            "git",
            RecordedCall::Push {
                remote: remote.to_string(),
                branch: branch.to_string(),
                set_upstream,
            },
        )
    }
}

/// [`RepositoryHost`] that records calls instead of running `gh`.
#[derive(Debug, Clone, Default)]
pub struct RecordingRepositoryHost {
    shared: Shared,
}

impl RecordingRepositoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self) -> Self {
        self.shared.update(|r| r.fail_on = Some("create_repository"));
        self
    }

    pub fn missing(self) -> Self {
        self.shared.update(|r| r.missing = true);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.calls()
    }
}

impl RepositoryHost for RecordingRepositoryHost {
    fn ensure_available(&self) -> ScaffoldResult<()> {
        self.shared.available("gh")
    }

    fn create_repository(&self, _root: &Path, request: &RepositoryRequest) -> ScaffoldResult<()> {
        self.shared.record(
            "create_repository",
            "gh",
            RecordedCall::CreateRepository(request.clone()),
        )
    }
}
