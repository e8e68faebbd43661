// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stackgen.
//!
//! This module contains pure logic: parsing and validating the project
//! specification, deriving the layout plan, the role catalog, and checking
//! role assignments against it.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process, or network calls
//! - **Few external crates**: std + thiserror + serde/serde_json
//! - **Immutable values**: a spec is read once and never mutated
//!
// Public API - what the world sees
pub mod assignments;
pub mod error;
pub mod layout;
pub mod paths;
pub mod project_spec;
pub mod role_catalog;
pub mod settings;

// Re-exports for convenience
pub use assignments::{AssignedRole, UserAssignment, UsersDocument};
pub use error::{DomainError, ErrorCategory};
pub use layout::{CopiedSource, LayoutPlan, PlannedEntry};
pub use paths::{RelativePath, expand_home, validate_project_name};
pub use project_spec::{AppSpec, DuplicatePolicy, ProjectSpec, SharedResource};
pub use role_catalog::{RoleCatalog, RoleDefinition, RoleScope};
pub use settings::{GitIdentity, PublishSettings, RepositoryRequest, Visibility};

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn spec(json: &str) -> ProjectSpec {
        ProjectSpec::from_json(json).unwrap()
    }

    fn paths(plan: &LayoutPlan) -> Vec<PathBuf> {
        plan.entries().iter().map(|e| e.path().to_path_buf()).collect()
    }

    // ========================================================================
    // Layout Plan Tests
    // ========================================================================

    #[test]
    fn root_placeholders_come_first() {
        let plan = LayoutPlan::build("/out/demo", &spec("{}"), None, None).unwrap();

        assert_eq!(plan.root(), Path::new("/out/demo"));
        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(".gitignore"),
                PathBuf::from("docker-compose.yml"),
                PathBuf::from(".env"),
                PathBuf::from("README.md"),
                PathBuf::from("shared"),
            ]
        );
        assert!(!plan.copies_ignore_file());
    }

    #[test]
    fn shared_entries_follow_spec_order() {
        let plan = LayoutPlan::build(
            "/out/demo",
            &spec(r#"{"shared": ["a/", "b.txt"]}"#),
            None,
            None,
        )
        .unwrap();

        let shared: Vec<_> = plan
            .entries()
            .iter()
            .filter(|e| e.path().starts_with("shared") && e.path() != Path::new("shared"))
            .cloned()
            .collect();
        assert_eq!(
            shared,
            vec![
                PlannedEntry::Directory(PathBuf::from("shared/a")),
                PlannedEntry::EmptyFile(PathBuf::from("shared/b.txt")),
            ]
        );
    }

    #[test]
    fn app_unit_layout() {
        let plan = LayoutPlan::build(
            "/out/demo",
            &spec(r#"{"apps": [{"name": "svc", "config": "config.yml", "init": "start.sh"}]}"#),
            None,
            None,
        )
        .unwrap();

        let app: Vec<_> = plan
            .entries()
            .iter()
            .filter(|e| e.path().starts_with("svc"))
            .cloned()
            .collect();
        assert_eq!(
            app,
            vec![
                PlannedEntry::Directory(PathBuf::from("svc/src")),
                PlannedEntry::EmptyFile(PathBuf::from("svc/Dockerfile")),
                PlannedEntry::EmptyFile(PathBuf::from("svc/config.yml")),
                PlannedEntry::EmptyFile(PathBuf::from("svc/start.sh")),
            ]
        );
    }

    #[test]
    fn duplicate_apps_merge_into_one_directory() {
        let plan = LayoutPlan::build(
            "/out/demo",
            &spec(
                r#"{"apps": [
                    {"name": "svc", "config": "a.yml", "init": "run.sh"},
                    {"name": "svc", "config": "b.yml", "init": "run.sh"}
                ]}"#,
            ),
            None,
            None,
        )
        .unwrap();

        let app: Vec<_> = plan
            .entries()
            .iter()
            .filter(|e| e.path().starts_with("svc"))
            .map(|e| e.path().to_path_buf())
            .collect();
        assert_eq!(
            app,
            vec![
                PathBuf::from("svc/src"),
                PathBuf::from("svc/Dockerfile"),
                PathBuf::from("svc/a.yml"),
                PathBuf::from("svc/run.sh"),
                PathBuf::from("svc/b.yml"),
            ]
        );
    }

    #[test]
    fn copied_ignore_file_keeps_bytes() {
        let ignore = CopiedSource {
            source: PathBuf::from("/home/dev/.gitignore_global"),
            content: b"target/\n*.log\n".to_vec(),
        };
        let plan = LayoutPlan::build("/out/demo", &spec("{}"), Some(ignore), None).unwrap();

        assert!(plan.copies_ignore_file());
        match &plan.entries()[0] {
            PlannedEntry::CopiedFile {
                content,
                executable,
                ..
            } => {
                assert_eq!(content, b"target/\n*.log\n");
                assert!(!executable);
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn helper_lands_at_root_as_executable() {
        let helper = CopiedSource {
            source: PathBuf::from("/opt/tools/bootstrap.sh"),
            content: b"#!/bin/sh\n".to_vec(),
        };
        let plan = LayoutPlan::build("/out/demo", &spec("{}"), None, Some(helper)).unwrap();

        let last = plan.entries().last().unwrap();
        assert_eq!(last.path(), Path::new("bootstrap.sh"));
        assert!(matches!(last, PlannedEntry::CopiedFile { executable: true, .. }));
    }

    #[test]
    fn helper_named_like_a_generated_file_is_left_out() {
        let helper = CopiedSource {
            source: PathBuf::from("/opt/tools/README.md"),
            content: b"#!/bin/sh\n".to_vec(),
        };
        let plan = LayoutPlan::build("/out/demo", &spec("{}"), None, Some(helper)).unwrap();

        assert_eq!(plan.helper_conflict(), Some(Path::new("README.md")));
        assert!(
            plan.entries()
                .iter()
                .all(|e| !matches!(e, PlannedEntry::CopiedFile { executable: true, .. }))
        );
    }

    #[test]
    fn helper_named_like_an_app_is_left_out() {
        let helper = CopiedSource {
            source: PathBuf::from("/opt/tools/svc"),
            content: b"#!/bin/sh\n".to_vec(),
        };
        let plan = LayoutPlan::build(
            "/out/demo",
            &spec(r#"{"apps": [{"name": "svc", "config": "c.yml", "init": "i.sh"}]}"#),
            None,
            Some(helper),
        )
        .unwrap();

        assert_eq!(plan.helper_conflict(), Some(Path::new("svc")));
        assert!(plan.entries().iter().all(|e| e.path() != Path::new("svc")));
    }

    #[test]
    fn directory_and_file_counts() {
        let plan = LayoutPlan::build(
            "/out/demo",
            &spec(
                r#"{"shared": ["a/", "b.txt"],
                    "apps": [{"name": "svc", "config": "c.yml", "init": "i.sh"}]}"#,
            ),
            None,
            None,
        )
        .unwrap();

        // shared, shared/a, svc/src
        assert_eq!(plan.directories().count(), 3);
        // 4 root files, shared/b.txt, 3 app files
        assert_eq!(plan.files().count(), 8);
        assert_eq!(plan.entry_count(), 11);
    }

    // ========================================================================
    // Settings Tests
    // ========================================================================

    #[test]
    fn identity_needs_both_parts() {
        assert!(GitIdentity::from_parts(Some("Dev".into()), None).is_none());
        assert!(GitIdentity::from_parts(Some("".into()), Some("d@x".into())).is_none());
        assert_eq!(
            GitIdentity::from_parts(Some("Dev".into()), Some("dev@example.com".into())),
            Some(GitIdentity {
                name: "Dev".into(),
                email: "dev@example.com".into()
            })
        );
    }

    #[test]
    fn repository_slug_includes_owner() {
        let mut settings = PublishSettings::default();
        assert_eq!(RepositoryRequest::new("demo", &settings).slug(), "demo");

        settings.owner = Some("acme".into());
        assert_eq!(RepositoryRequest::new("demo", &settings).slug(), "acme/demo");
    }

    #[test]
    fn visibility_parses_case_insensitively() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert!("secret".parse::<Visibility>().is_err());
        assert_eq!(Visibility::default(), Visibility::Private);
    }
}
