//! Scheduled commit-and-push of an existing working tree.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::application::ports::VersionControl;
use crate::error::ScaffoldResult;

/// Result of a commit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Changes were committed and pushed.
    Committed { message: String },
    /// The tree was clean; nothing was committed or pushed.
    NothingToCommit,
}

/// Stages, commits, and pushes whatever changed in a repository.
pub struct CommitService {
    vcs: Box<dyn VersionControl>,
}

impl CommitService {
    pub fn new(vcs: Box<dyn VersionControl>) -> Self {
        Self { vcs }
    }

    /// `Scheduled commit: YYYY-MM-DD`
    pub fn commit_message(date: NaiveDate) -> String {
        format!("Scheduled commit: {}", date.format("%Y-%m-%d"))
    }

    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn commit_and_push(
        &self,
        root: &Path,
        date: NaiveDate,
        remote: &str,
        branch: &str,
    ) -> ScaffoldResult<CommitOutcome> {
        self.vcs.ensure_available()?;

        if !self.vcs.has_pending_changes(root)? {
            info!("Working tree clean, nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        let message = Self::commit_message(date);
        self.vcs.stage_all(root)?;
        self.vcs.commit(root, &message, false)?;
        self.vcs.push(root, remote, branch, false)?;
        info!(%message, %remote, %branch, "Changes committed and pushed");

        Ok(CommitOutcome::Committed { message })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::MockVersionControl;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn message_uses_iso_date() {
        assert_eq!(
            CommitService::commit_message(date()),
            "Scheduled commit: 2024-03-07"
        );
    }

    #[test]
    fn clean_tree_skips_commit_and_push() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_available().returning(|| Ok(()));
        vcs.expect_has_pending_changes().returning(|_| Ok(false));
        vcs.expect_commit().never();
        vcs.expect_push().never();

        let outcome = CommitService::new(Box::new(vcs))
            .commit_and_push(Path::new("/repo"), date(), "origin", "main")
            .unwrap();
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
    }

    #[test]
    fn changes_are_staged_committed_and_pushed() {
        let calls = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_available().returning(|| Ok(()));
        vcs.expect_has_pending_changes().returning(|_| Ok(true));
        let log = Arc::clone(&calls);
        vcs.expect_stage_all().returning(move |_| {
            log.lock().unwrap().push("add".into());
            Ok(())
        });
        let log = Arc::clone(&calls);
        vcs.expect_commit().returning(move |_, msg, _| {
            log.lock().unwrap().push(format!("commit {msg}"));
            Ok(())
        });
        let log = Arc::clone(&calls);
        vcs.expect_push().returning(move |_, remote, branch, _| {
            log.lock().unwrap().push(format!("push {remote} {branch}"));
            Ok(())
        });

        let outcome = CommitService::new(Box::new(vcs))
            .commit_and_push(Path::new("/repo"), date(), "origin", "main")
            .unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Committed {
                message: "Scheduled commit: 2024-03-07".into()
            }
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["add", "commit Scheduled commit: 2024-03-07", "push origin main"]
        );
    }

    #[test]
    fn push_failure_is_reported() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_available().returning(|| Ok(()));
        vcs.expect_has_pending_changes().returning(|_| Ok(true));
        vcs.expect_stage_all().returning(|_| Ok(()));
        vcs.expect_commit().returning(|_, _, _| Ok(()));
        vcs.expect_push().returning(|_, _, _, _| {
            Err(ApplicationError::ExternalTool {
                tool: "git",
                command: "git push origin main".into(),
                details: "no upstream".into(),
            }
            .into())
        });

        let result = CommitService::new(Box::new(vcs)).commit_and_push(
            Path::new("/repo"),
            date(),
            "origin",
            "main",
        );
        assert!(result.is_err());
    }
}
