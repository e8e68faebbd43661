//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Spec and catalog validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The specification file is missing or cannot be read.
    #[error("Cannot read specification {path}: {reason}")]
    SpecUnreadable { path: PathBuf, reason: String },

    /// A required command-line tool is not installed.
    #[error("Required tool '{tool}' was not found: {reason}")]
    ToolMissing { tool: &'static str, reason: String },

    /// An external tool ran and reported failure.
    #[error("{tool} failed while running `{command}`: {details}")]
    ExternalTool {
        tool: &'static str,
        command: String,
        details: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A shared lock was poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SpecUnreadable { path, .. } => vec![
                format!("Check that '{}' exists and is readable", path.display()),
                "Usage: stackgen generate <SPEC> <NAME>".into(),
            ],
            Self::ToolMissing { tool, .. } => {
                let mut out = vec![format!("Install '{}' and make sure it is on your PATH", tool)];
                if *tool == "gh" {
                    out.push("Or skip publishing with --no-publish".into());
                }
                out
            }
            Self::ExternalTool { tool, .. } => vec![
                format!("Check the {} output above for details", tool),
                "Credentials: set publish.token / git.user_name / git.user_email in the config"
                    .into(),
                "Created files are rolled back unless --no-rollback was given".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Remove '{}' manually before retrying", path.display()),
            ],
            Self::LockPoisoned => vec![
                "This appears to be a bug in Stackgen".into(),
                "Please report this issue at: https://github.com/stackgen/stackgen/issues".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SpecUnreadable { .. } => ErrorCategory::Input,
            Self::ToolMissing { .. } => ErrorCategory::Environment,
            Self::ExternalTool { .. } => ErrorCategory::ExternalTool,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Filesystem,
            Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
