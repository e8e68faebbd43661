//! Infrastructure adapters for Stackgen.
//!
//! This crate implements the ports defined in `stackgen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod host;
pub mod recording;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use host::GitHubCli;
pub use recording::{RecordedCall, RecordingRepositoryHost, RecordingVersionControl};
pub use vcs::GitCommand;
