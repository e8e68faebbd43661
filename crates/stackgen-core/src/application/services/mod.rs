//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "commit and push".

pub mod commit_service;
pub(crate) mod journal;
pub mod scaffold_service;

pub use commit_service::{CommitOutcome, CommitService};
pub use scaffold_service::{
    ScaffoldOptions, ScaffoldPlan, ScaffoldReport, ScaffoldService, SkippedHelper,
};
