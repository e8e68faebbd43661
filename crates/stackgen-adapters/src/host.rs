//! Repository host adapter that shells out to the GitHub CLI.

use std::path::Path;
use std::process::Command;

use tracing::info;

use stackgen_core::{
    application::{ApplicationError, ports::RepositoryHost},
    domain::RepositoryRequest,
    error::ScaffoldResult,
};

use crate::vcs::{run_command, tool_missing};

const TOOL: &str = "gh";

/// Creates repositories with `gh repo create`.
///
/// A configured token is exported to the child as `GH_TOKEN`; otherwise
/// `gh` uses whatever login it already has.
#[derive(Debug, Clone)]
pub struct GitHubCli {
    program: String,
    token: Option<String>,
}

impl GitHubCli {
    pub fn new() -> Self {
        Self {
            program: TOOL.to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(token) = &self.token {
            command.env("GH_TOKEN", token);
        }
        command
    }

    /// Arguments for `gh repo create`, run from inside the project root.
    fn create_args(request: &RepositoryRequest) -> Vec<String> {
        vec![
            "repo".into(),
            "create".into(),
            request.slug(),
            format!("--{}", request.visibility),
            "--source=.".into(),
            format!("--remote={}", request.remote),
            "--push".into(),
        ]
    }
}

impl Default for GitHubCli {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryHost for GitHubCli {
    fn ensure_available(&self) -> ScaffoldResult<()> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .map_err(|e| tool_missing(TOOL, e))?;
        if !output.status.success() {
            return Err(ApplicationError::ToolMissing {
                tool: TOOL,
                reason: format!("`{} --version` exited with {}", self.program, output.status),
            }
            .into());
        }
        Ok(())
    }

    fn create_repository(&self, root: &Path, request: &RepositoryRequest) -> ScaffoldResult<()> {
        let mut command = self.command();
        command.current_dir(root).args(Self::create_args(request));
        let url = run_command(command, TOOL)?;
        info!(repository = %request.slug(), url = %url, "Repository created");
        Ok(())
    }
}
