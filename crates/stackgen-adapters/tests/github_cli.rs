//! Runs `GitHubCli` against a stand-in `gh` script that records how it
//! was invoked.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use stackgen_adapters::GitHubCli;
use stackgen_core::application::ports::RepositoryHost;
use stackgen_core::domain::{PublishSettings, RepositoryRequest, Visibility};
use stackgen_core::error::ErrorCategory;

/// Write an executable `gh` that logs its working directory and arguments,
/// and fails unless `--source` names an existing directory.
fn fake_gh(bin: &Path, log: &Path) -> PathBuf {
    let script = format!(
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo "gh version 2.0.0"; exit 0; fi
echo "cwd=$PWD" > "{log}"
for arg in "$@"; do
  echo "arg=$arg" >> "{log}"
  case "$arg" in
    --source=*) src="${{arg#--source=}}" ;;
  esac
done
if [ ! -d "$src" ]; then echo "source $src is not a directory" >&2; exit 1; fi
echo "https://github.com/acme/demo"
"#,
        log = log.display()
    );
    let path = bin.join("gh");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn repository_is_created_from_inside_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("work/demo");
    std::fs::create_dir_all(&root).unwrap();
    let log = dir.path().join("gh.log");
    let gh = GitHubCli::new().with_program(fake_gh(dir.path(), &log).display().to_string());

    let settings = PublishSettings {
        owner: Some("acme".into()),
        visibility: Visibility::Internal,
        ..Default::default()
    };
    gh.ensure_available().unwrap();
    gh.create_repository(&root, &RepositoryRequest::new("demo", &settings))
        .unwrap();

    let logged = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = logged.lines().collect();
    let cwd = lines[0].strip_prefix("cwd=").unwrap();
    assert_eq!(
        Path::new(cwd).canonicalize().unwrap(),
        root.canonicalize().unwrap()
    );
    assert_eq!(
        &lines[1..],
        [
            "arg=repo",
            "arg=create",
            "arg=acme/demo",
            "arg=--internal",
            "arg=--source=.",
            "arg=--remote=origin",
            "arg=--push",
        ]
    );
}

#[test]
fn host_failure_is_labelled_gh_whatever_the_program_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("github-wrapper");
    std::fs::write(&path, "#!/bin/sh\necho 'HTTP 401: Bad credentials' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let gh = GitHubCli::new().with_program(path.display().to_string());
    let err = gh
        .create_repository(dir.path(), &RepositoryRequest::new("demo", &PublishSettings::default()))
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ExternalTool);
    let message = err.to_string();
    assert!(message.starts_with("gh failed"), "{message}");
    assert!(message.contains("Bad credentials"), "{message}");
}
