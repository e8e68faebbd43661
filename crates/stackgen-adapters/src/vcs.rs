//! Version control adapter that shells out to `git`.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use stackgen_core::{
    application::{ApplicationError, ports::VersionControl},
    domain::GitIdentity,
    error::{ScaffoldError, ScaffoldResult},
};

const TOOL: &str = "git";

/// Runs the `git` client found on `PATH`.
///
/// When an identity is configured it is passed to every commit with
/// `-c user.name=... -c user.email=...`, so nothing depends on the
/// invoking user's global git configuration.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
    identity: Option<GitIdentity>,
}

impl GitCommand {
    pub fn new() -> Self {
        Self {
            program: TOOL.to_string(),
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: Option<GitIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Use a different executable (e.g. an absolute path to `git`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, root: Option<&Path>) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(root) = root {
            command.current_dir(root);
        }
        command
    }

    fn run<I, S>(&self, root: Option<&Path>, args: I) -> ScaffoldResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = self.command(root);
        command.args(args);
        run_command(command, TOOL)
    }

    fn has_head(&self, root: &Path) -> bool {
        self.run(Some(root), ["rev-parse", "--verify", "--quiet", "HEAD"])
            .is_ok()
    }

    fn identity_args(&self) -> Vec<String> {
        match &self.identity {
            Some(identity) => vec![
                "-c".into(),
                format!("user.name={}", identity.name),
                "-c".into(),
                format!("user.email={}", identity.email),
            ],
            None => Vec::new(),
        }
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCommand {
    fn ensure_available(&self) -> ScaffoldResult<()> {
        self.command(None)
            .arg("--version")
            .output()
            .map_err(|e| tool_missing(TOOL, e))
            .and_then(|output| {
                if output.status.success() {
                    Ok(())
                } else {
                    Err(ApplicationError::ToolMissing {
                        tool: TOOL,
                        reason: format!("`{} --version` exited with {}", self.program, output.status),
                    }
                    .into())
                }
            })
    }

    fn init(&self, root: &Path) -> ScaffoldResult<()> {
        self.run(Some(root), ["init", "--quiet"]).map(drop)
    }

    fn stage_all(&self, root: &Path) -> ScaffoldResult<()> {
        self.run(Some(root), ["add", "--all", "."]).map(drop)
    }

    fn unstage_all(&self, root: &Path) -> ScaffoldResult<()> {
        if self.has_head(root) {
            self.run(Some(root), ["reset", "--quiet"]).map(drop)
        } else {
            self.run(Some(root), ["read-tree", "--empty"]).map(drop)
        }
    }

    fn has_pending_changes(&self, root: &Path) -> ScaffoldResult<bool> {
        let status = self.run(Some(root), ["status", "--porcelain"])?;
        Ok(!status.is_empty())
    }

    fn commit(&self, root: &Path, message: &str, allow_empty: bool) -> ScaffoldResult<()> {
        let mut args = self.identity_args();
        args.extend(["commit".into(), "--quiet".into(), "-m".into(), message.into()]);
        if allow_empty {
            args.push("--allow-empty".into());
        }
        self.run(Some(root), args).map(drop)
    }

    fn undo_last_commit(&self, root: &Path) -> ScaffoldResult<()> {
        let has_parent = self
            .run(Some(root), ["rev-parse", "--verify", "--quiet", "HEAD~1"])
            .is_ok();
        if has_parent {
            self.run(Some(root), ["reset", "--quiet", "--mixed", "HEAD~1"])
                .map(drop)
        } else {
            // Root commit: unset the branch so it is unborn again
            self.run(Some(root), ["update-ref", "-d", "HEAD"])?;
            self.run(Some(root), ["read-tree", "--empty"]).map(drop)
        }
    }

    fn has_remote(&self, root: &Path, remote: &str) -> ScaffoldResult<bool> {
        match self.run(Some(root), ["remote", "get-url", remote]) {
            Ok(_) => Ok(true),
            Err(ScaffoldError::Application(ApplicationError::ExternalTool { .. })) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn rename_branch(&self, root: &Path, branch: &str) -> ScaffoldResult<()> {
        self.run(Some(root), ["branch", "-M", branch]).map(drop)
    }

    fn push(
        &self,
        root: &Path,
        remote: &str,
        branch: &str,
        set_upstream: bool,
    ) -> ScaffoldResult<()> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.extend([remote, branch]);
        self.run(Some(root), args).map(drop)
    }
}

/// Run a prepared command, mapping spawn failures and non-zero exits.
///
/// `tool` names the client in errors, whatever executable was configured.
pub(crate) fn run_command(mut command: Command, tool: &'static str) -> ScaffoldResult<String> {
    let rendered = render(&command);
    debug!(command = %rendered, "Running external command");

    let output = command.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            tool_missing(tool, e)
        } else {
            ApplicationError::ExternalTool {
                tool,
                command: rendered.clone(),
                details: e.to_string(),
            }
            .into()
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ApplicationError::ExternalTool {
            tool,
            command: rendered,
            details: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub(crate) fn tool_missing(tool: &'static str, e: io::Error) -> ScaffoldError {
    ApplicationError::ToolMissing {
        tool,
        reason: e.to_string(),
    }
    .into()
}

fn render(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackgen_core::error::ErrorCategory;

    #[test]
    fn missing_binary_is_tool_missing() {
        let git = GitCommand::new().with_program("stackgen-no-such-git-binary");
        let err = git.ensure_available().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Environment);
    }

    #[test]
    fn identity_is_passed_as_config_overrides() {
        let git = GitCommand::new().with_identity(Some(GitIdentity {
            name: "Bot".into(),
            email: "bot@example.com".into(),
        }));
        assert_eq!(
            git.identity_args(),
            vec!["-c", "user.name=Bot", "-c", "user.email=bot@example.com"]
        );
        assert!(GitCommand::new().identity_args().is_empty());
    }

    #[test]
    fn rendered_command_names_program_and_args() {
        let mut command = Command::new("git");
        command.args(["push", "-u", "origin", "main"]);
        assert_eq!(render(&command), "git push -u origin main");
    }

    #[test]
    fn failures_carry_the_given_tool_label() {
        let command = Command::new("stackgen-no-such-gh-wrapper");
        match run_command(command, "gh") {
            Err(ScaffoldError::Application(ApplicationError::ToolMissing { tool, .. })) => {
                assert_eq!(tool, "gh");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
