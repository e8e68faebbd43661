//! Unified error handling for Stackgen Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Stackgen Core operations.
#[derive(Debug, Error, Clone)]
pub enum ScaffoldError {
    /// Errors from the domain layer (spec or catalog violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl ScaffoldError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Usage => ErrorCategory::Usage,
                crate::domain::ErrorCategory::Validation => ErrorCategory::Input,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// True when nothing on disk or in version control was touched yet.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Usage | ErrorCategory::Input | ErrorCategory::Environment
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing arguments.
    Usage,
    /// Spec file missing, unreadable, malformed, or invalid.
    Input,
    /// A required external tool is absent.
    Environment,
    /// An external tool ran and failed.
    ExternalTool,
    Filesystem,
    NotFound,
    /// Bugs and poisoned state.
    Internal,
}

/// Convenient result type alias.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
