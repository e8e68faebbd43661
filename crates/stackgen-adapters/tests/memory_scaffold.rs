//! Generation against the in-memory filesystem: no disk, no external tools.

use std::path::{Path, PathBuf};

use stackgen_adapters::{
    MemoryFilesystem, RecordedCall, RecordingRepositoryHost, RecordingVersionControl,
};
use stackgen_core::application::{ScaffoldOptions, ScaffoldService};

const SPEC: &str = r#"{
    "gitignore": "~/.gitignore",
    "shared": ["libs/", "notes.md"],
    "apps": [{"name": "api", "config": "app.yml", "init": "init.sh"}]
}"#;

fn seeded() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_dir("/out")
        .with_file("/spec.json", SPEC)
        .with_file("/home/dev/.gitignore", "target/\n")
}

fn options() -> ScaffoldOptions {
    ScaffoldOptions {
        output_dir: PathBuf::from("/out"),
        home_dir: Some(PathBuf::from("/home/dev")),
        ..Default::default()
    }
}

fn service(
    fs: &MemoryFilesystem,
    vcs: &RecordingVersionControl,
    host: &RecordingRepositoryHost,
) -> ScaffoldService {
    ScaffoldService::new(Box::new(fs.clone()), Box::new(vcs.clone()), Box::new(host.clone()))
}

fn project_files(fs: &MemoryFilesystem) -> Vec<PathBuf> {
    fs.list_files()
        .into_iter()
        .filter(|p| p.starts_with("/out/demo"))
        .collect()
}

#[test]
fn layout_and_helper_are_written() {
    let fs = seeded().with_file("/opt/bootstrap.sh", "#!/bin/sh\n");
    let vcs = RecordingVersionControl::new();
    let host = RecordingRepositoryHost::new();
    let opts = ScaffoldOptions {
        helper: Some(PathBuf::from("/opt/bootstrap.sh")),
        ..options()
    };

    let report = service(&fs, &vcs, &host)
        .generate(Path::new("/spec.json"), "demo", &opts)
        .unwrap();

    assert!(report.helper_imported);
    assert_eq!(
        project_files(&fs),
        [
            "/out/demo/.env",
            "/out/demo/.gitignore",
            "/out/demo/README.md",
            "/out/demo/api/Dockerfile",
            "/out/demo/api/app.yml",
            "/out/demo/api/init.sh",
            "/out/demo/bootstrap.sh",
            "/out/demo/docker-compose.yml",
            "/out/demo/shared/notes.md",
        ]
        .map(PathBuf::from)
    );
    assert!(fs.is_dir("/out/demo/shared/libs"));
    assert!(fs.is_dir("/out/demo/api/src"));
    assert_eq!(fs.contents("/out/demo/.gitignore").as_deref(), Some("target/\n"));
    assert!(fs.is_executable("/out/demo/bootstrap.sh"));
    assert_eq!(host.calls().len(), 1);
}

#[test]
fn helper_clashing_with_a_placeholder_is_not_copied() {
    let fs = seeded().with_file("/opt/README.md", "#!/bin/sh\n");
    let vcs = RecordingVersionControl::new();
    let host = RecordingRepositoryHost::new();
    let opts = ScaffoldOptions {
        helper: Some(PathBuf::from("/opt/README.md")),
        publish: None,
        ..options()
    };

    let service = service(&fs, &vcs, &host);
    let plan = service.plan(Path::new("/spec.json"), "demo", &opts).unwrap();
    assert!(plan.skipped_helper.is_some());

    let report = service.apply(&plan, true).unwrap();
    assert!(!report.helper_imported);
    assert_eq!(fs.contents("/out/demo/README.md").as_deref(), Some(""));
    assert!(!fs.is_executable("/out/demo/README.md"));
}

#[test]
fn published_project_rerun_pushes_to_existing_remote() {
    let fs = seeded().with_dir("/out/demo/.git");
    let vcs = RecordingVersionControl::new().with_remote("origin");
    let host = RecordingRepositoryHost::new();

    let report = service(&fs, &vcs, &host)
        .generate(Path::new("/spec.json"), "demo", &options())
        .unwrap();

    assert_eq!(report.published.as_deref(), Some("demo"));
    assert!(host.calls().is_empty());
    assert_eq!(
        vcs.calls(),
        vec![
            RecordedCall::StageAll(PathBuf::from("/out/demo")),
            RecordedCall::Commit {
                message: "Initial commit for demo".into(),
                allow_empty: true,
            },
            RecordedCall::RenameBranch("main".into()),
            RecordedCall::Push {
                remote: "origin".into(),
                branch: "main".into(),
                set_upstream: true,
            },
        ]
    );
}

#[test]
fn failed_push_on_existing_repository_is_compensated() {
    let fs = seeded()
        .with_dir("/out/demo/.git")
        .with_file("/out/demo/README.md", "keep\n");
    let vcs = RecordingVersionControl::new().failing_on("push");
    let host = RecordingRepositoryHost::new();

    assert!(
        service(&fs, &vcs, &host)
            .generate(Path::new("/spec.json"), "demo", &options())
            .is_err()
    );

    let root = PathBuf::from("/out/demo");
    let calls = vcs.calls();
    assert_eq!(
        calls[calls.len() - 2..],
        [
            RecordedCall::UndoLastCommit(root.clone()),
            RecordedCall::UnstageAll(root.clone()),
        ]
    );
    assert_eq!(project_files(&fs), vec![root.join("README.md")]);
    assert_eq!(fs.contents("/out/demo/README.md").as_deref(), Some("keep\n"));
    assert!(fs.is_dir("/out/demo/.git"));
    // The remote that was created is reported, not deleted
    assert_eq!(host.calls().len(), 1);
}
