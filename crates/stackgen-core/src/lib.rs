//! Stackgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stackgen
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stackgen-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (ScaffoldService, CommitService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, VersionControl, Repo Host) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stackgen-adapters (Infrastructure)  │
//! │  (LocalFilesystem, GitCommand, GitHub)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ProjectSpec, LayoutPlan, RoleCatalog) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//! use stackgen_core::application::{ScaffoldOptions, ScaffoldService};
//!
//! let service = ScaffoldService::new(filesystem, vcs, host);
//! let report = service
//!     .generate(Path::new("spec.json"), "my-project", &ScaffoldOptions::default())
//!     .unwrap();
//! println!("created {}", report.root.display());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CommitOutcome, CommitService, ScaffoldOptions, ScaffoldPlan, ScaffoldReport,
        ScaffoldService,
        ports::{Filesystem, RepositoryHost, VersionControl},
    };
    pub use crate::domain::{
        AppSpec, DuplicatePolicy, GitIdentity, LayoutPlan, PlannedEntry, ProjectSpec,
        PublishSettings, RoleCatalog, RoleDefinition, RoleScope, UserAssignment, UsersDocument,
        Visibility,
    };
    pub use crate::error::{ErrorCategory, ScaffoldError, ScaffoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
