//! Implementation of the `stackgen commit` command.
//!
//! Meant to be run from a scheduler (cron, systemd timer); pair it with
//! `--log-file` so unattended runs leave a trace.

use std::path::PathBuf;

use chrono::Local;
use tracing::instrument;

use stackgen_adapters::GitCommand;
use stackgen_core::application::{CommitOutcome, CommitService};

use crate::{
    cli::CommitArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: CommitArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = args.root.unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", root.display()),
            source: None,
        });
    }

    let remote = args.remote.unwrap_or_else(|| config.publish.remote.clone());
    let branch = args.branch.unwrap_or_else(|| config.publish.branch.clone());
    let today = Local::now().date_naive();

    let service = CommitService::new(Box::new(
        GitCommand::new().with_identity(config.identity()),
    ));

    match service.commit_and_push(&root, today, &remote, &branch)? {
        CommitOutcome::Committed { message } => {
            output.success(&format!("{message} pushed to {remote}/{branch}"))?;
        }
        CommitOutcome::NothingToCommit => {
            output.info("Nothing to commit, working tree clean")?;
        }
    }

    Ok(())
}
