use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::project_spec::{ProjectSpec, SharedResource};
use super::paths::RelativePath;
use super::DomainError;

pub const IGNORE_FILE: &str = ".gitignore";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const ENV_FILE: &str = ".env";
pub const README_FILE: &str = "README.md";
pub const SHARED_DIR: &str = "shared";
pub const SOURCE_DIR: &str = "src";
pub const DOCKERFILE: &str = "Dockerfile";

/// Placeholders created at the root of every project, in creation order.
pub const ROOT_PLACEHOLDERS: [&str; 3] = [COMPOSE_FILE, ENV_FILE, README_FILE];

/// A file whose bytes were read from outside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedSource {
    pub source: PathBuf,
    pub content: Vec<u8>,
}

/// Final layout ready for materialization.
///
/// This is the output of planning. It contains no I/O, only data, and every
/// path in `entries` is relative to `root`.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<PlannedEntry>,
    pub(crate) helper_conflict: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEntry {
    Directory(PathBuf),
    /// Created empty if absent; an existing file keeps its content.
    EmptyFile(PathBuf),
    /// Written with `content`, replacing whatever was there.
    CopiedFile {
        path: PathBuf,
        source: PathBuf,
        content: Vec<u8>,
        executable: bool,
    },
}

impl PlannedEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(p) | Self::EmptyFile(p) => p,
            Self::CopiedFile { path, .. } => path,
        }
    }
}

impl LayoutPlan {
    /// Derive the layout for `spec`.
    ///
    /// `ignore` is the already-read `.gitignore` source (an empty file is
    /// planned when it is `None`). `helper` is the already-read auxiliary
    /// script; it lands at the root under its own file name, unless that
    /// name is already taken by a generated entry (see `helper_conflict`).
    pub fn build(
        root: impl Into<PathBuf>,
        spec: &ProjectSpec,
        ignore: Option<CopiedSource>,
        helper: Option<CopiedSource>,
    ) -> Result<Self, DomainError> {
        let mut plan = PlanBuilder::new(root.into());

        match ignore {
            Some(CopiedSource { source, content }) => {
                plan.copied(PathBuf::from(IGNORE_FILE), source, content, false);
            }
            None => plan.file(PathBuf::from(IGNORE_FILE)),
        }

        for placeholder in ROOT_PLACEHOLDERS {
            plan.file(PathBuf::from(placeholder));
        }

        let shared_root = Path::new(SHARED_DIR);
        plan.directory(shared_root.to_path_buf());
        for resource in spec.shared()? {
            let path = shared_root.join(resource.path());
            match resource {
                SharedResource::Directory(_) => plan.directory(path),
                SharedResource::File(_) => plan.file(path),
            }
        }

        for app in &spec.apps {
            let app_root = Path::new(&app.name);
            plan.directory(app_root.join(SOURCE_DIR));
            plan.file(app_root.join(DOCKERFILE));
            plan.file(app_root.join(RelativePath::try_new("config", &app.config)?));
            plan.file(app_root.join(RelativePath::try_new("init", &app.init)?));
        }

        if let Some(CopiedSource { source, content }) = helper {
            if let Some(name) = source.file_name().map(PathBuf::from) {
                if plan.claims(&name) {
                    plan.helper_conflict = Some(name);
                } else {
                    plan.copied(name, source, content, true);
                }
            }
        }

        Ok(plan.finish())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            PlannedEntry::Directory(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.entries
            .iter()
            .filter(|e| !matches!(e, PlannedEntry::Directory(_)))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Helper file name that collided with a generated entry and was left out.
    pub fn helper_conflict(&self) -> Option<&Path> {
        self.helper_conflict.as_deref()
    }

    /// Whether the ignore file is copied rather than created empty.
    pub fn copies_ignore_file(&self) -> bool {
        self.entries.iter().any(|e| {
            matches!(e, PlannedEntry::CopiedFile { path, .. } if path == Path::new(IGNORE_FILE))
        })
    }
}

/// Collects entries in order, dropping repeats so duplicate apps merge.
struct PlanBuilder {
    root: PathBuf,
    entries: Vec<PlannedEntry>,
    seen: HashSet<PathBuf>,
    helper_conflict: Option<PathBuf>,
}

impl PlanBuilder {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: Vec::new(),
            seen: HashSet::new(),
            helper_conflict: None,
        }
    }

    fn directory(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.entries.push(PlannedEntry::Directory(path));
        }
    }

    fn file(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.entries.push(PlannedEntry::EmptyFile(path));
        }
    }

    fn copied(&mut self, path: PathBuf, source: PathBuf, content: Vec<u8>, executable: bool) {
        if self.seen.insert(path.clone()) {
            self.entries.push(PlannedEntry::CopiedFile {
                path,
                source,
                content,
                executable,
            });
        }
    }

    /// Whether `path` or anything below it is already planned.
    fn claims(&self, path: &Path) -> bool {
        self.seen.iter().any(|p| p.starts_with(path))
    }

    fn finish(self) -> LayoutPlan {
        LayoutPlan {
            root: self.root,
            entries: self.entries,
            helper_conflict: self.helper_conflict,
        }
    }
}
