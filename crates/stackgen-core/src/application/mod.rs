//! Application layer for Stackgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, CommitService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! spec rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CommitOutcome, CommitService, ScaffoldOptions, ScaffoldPlan, ScaffoldReport,
    ScaffoldService, SkippedHelper,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, RepositoryHost, VersionControl};

pub use error::ApplicationError;
