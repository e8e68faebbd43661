// ============================================================================
// domain/error.rs - SPEC AND CATALOG VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the same failure can be logged and returned)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Specification document errors
    // ========================================================================
    #[error("Malformed specification document: {0}")]
    MalformedSpec(String),

    #[error("Invalid application name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Invalid path '{path}' in '{field}': {reason}")]
    InvalidSpecPath {
        field: &'static str,
        path: String,
        reason: String,
    },

    #[error("Duplicate application name: {name}")]
    DuplicateApp { name: String },

    // ========================================================================
    // Project naming
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // ========================================================================
    // Role catalog
    // ========================================================================
    #[error("Malformed role catalog: {0}")]
    MalformedCatalog(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    // ========================================================================
    // Role assignments
    // ========================================================================
    #[error("Malformed users document: {0}")]
    MalformedUsers(String),

    #[error("Users document declares no users")]
    NoUsers,

    #[error("Invalid user entry #{index}: {reason}")]
    InvalidUser { index: usize, reason: String },

    #[error("User '{user}' is assigned '{role}', which is not in the role catalog")]
    UnassignableRole { user: String, role: String },

    #[error("User '{user}' is assigned bucket role '{role}' but no bucket was given")]
    MissingBucket { user: String, role: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedSpec(_) => vec![
                "The specification must be a JSON object".into(),
                r#"Expected shape: {"gitignore": "~/.gitignore", "shared": ["config/"], "apps": [{"name": "api", "config": "config.yml", "init": "start.sh"}]}"#.into(),
            ],
            Self::InvalidAppName { name, .. } => vec![
                format!("'{}' is used as a directory name", name),
                "Use a single path segment without '/' or '\\'".into(),
                "Examples: api, worker, web-ui".into(),
            ],
            Self::InvalidSpecPath { field, .. } => vec![
                format!("Entries in '{}' must be relative paths", field),
                "Paths may not start with '/' or climb out with '..'".into(),
            ],
            Self::DuplicateApp { name } => vec![
                format!("Application '{}' is declared more than once", name),
                "Rename one of the entries, or drop --strict to merge them".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::MalformedCatalog(_) => vec![
                r#"Expected shape: {"roles": {"<id>": {"role": "...", "type": "bucket", "description": "..."}}}"#.into(),
            ],
            Self::InvalidSetting(_) => vec![
                "Check the value against the accepted choices (e.g. public, private, internal)".into(),
            ],
            Self::UnknownRole(_) => vec!["Try: stackgen roles list".into()],
            Self::MalformedUsers(_) => vec![
                r#"Expected shape: {"users": [{"username": "...", "password": "...", "roles": [{"role": "data_reader"}]}]}"#.into(),
            ],
            Self::NoUsers => vec!["Add at least one entry to the \"users\" array".into()],
            Self::InvalidUser { .. } => vec![
                "Every user needs \"username\", \"password\" and \"roles\"".into(),
            ],
            Self::UnassignableRole { .. } => vec![
                "Try: stackgen roles list".into(),
                "Or point --file at the catalog that defines it".into(),
            ],
            Self::MissingBucket { .. } => vec!["Pass the bucket with --bucket <NAME>".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } => ErrorCategory::Usage,
            Self::UnknownRole(_) => ErrorCategory::NotFound,
            Self::MissingBucket { .. } => ErrorCategory::Usage,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Validation,
    NotFound,
}
