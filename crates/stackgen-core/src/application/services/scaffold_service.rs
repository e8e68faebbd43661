//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Preflight: project name, spec file, spec contents, tools
//! 2. Plan the layout (pure, see `domain::layout`)
//! 3. Materialize it on the filesystem
//! 4. Initialize version control and commit
//! 5. Publish to the repository host
//!
//! Nothing is written until every preflight check has passed. Once writing
//! starts, every step is journaled so a failure can be rolled back.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, RepositoryHost, VersionControl},
        services::journal::{Journal, Step},
    },
    domain::{
        CopiedSource, DuplicatePolicy, LayoutPlan, PlannedEntry, ProjectSpec, PublishSettings,
        RepositoryRequest, expand_home, validate_project_name,
    },
    error::ScaffoldResult,
};

/// Knobs for one generation job.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Directory the project directory is created in.
    pub output_dir: PathBuf,
    /// Used to expand `~` in spec paths. `None` leaves `~` literal.
    pub home_dir: Option<PathBuf>,
    /// Helper script override; falls back to the spec's `helper` field.
    pub helper: Option<PathBuf>,
    pub duplicate_policy: DuplicatePolicy,
    /// Undo completed steps when a later one fails.
    pub rollback: bool,
    /// `None` skips remote publication.
    pub publish: Option<PublishSettings>,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            home_dir: None,
            helper: None,
            duplicate_policy: DuplicatePolicy::Warn,
            rollback: true,
            publish: Some(PublishSettings::default()),
        }
    }
}

/// Everything decided before the first write.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub project_name: String,
    pub spec: ProjectSpec,
    pub layout: LayoutPlan,
    /// App names declared more than once (merged).
    pub duplicate_apps: Vec<String>,
    /// Helper that was configured but left out of the layout.
    pub skipped_helper: Option<SkippedHelper>,
    pub publish: Option<PublishSettings>,
}

/// A configured helper script that will not be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedHelper {
    pub path: PathBuf,
    pub reason: String,
}

impl ScaffoldPlan {
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn commit_message(&self) -> String {
        format!("Initial commit for {}", self.project_name)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    /// Files and directories that did not exist before.
    pub created: usize,
    pub reused_root: bool,
    pub helper_imported: bool,
    pub initialized_repository: bool,
    /// `owner/name` of the published repository.
    pub published: Option<String>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    vcs: Box<dyn VersionControl>,
    host: Box<dyn RepositoryHost>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stackgen_core::application::{ScaffoldService, ports::*};
    ///
    /// let service = ScaffoldService::new(
    ///     filesystem, // impl Filesystem
    ///     vcs,        // impl VersionControl
    ///     host,       // impl RepositoryHost
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        vcs: Box<dyn VersionControl>,
        host: Box<dyn RepositoryHost>,
    ) -> Self {
        Self {
            filesystem,
            vcs,
            host,
        }
    }

    /// Generate a project: preflight, plan, check tools, apply.
    #[instrument(
        skip_all,
        fields(
            project = %project_name,
            spec = %spec_path.display(),
        )
    )]
    pub fn generate(
        &self,
        spec_path: &Path,
        project_name: &str,
        options: &ScaffoldOptions,
    ) -> ScaffoldResult<ScaffoldReport> {
        let plan = self.plan(spec_path, project_name, options)?;
        self.check_tools(plan.publish.is_some())?;
        self.apply(&plan, options.rollback)
    }

    /// Read and validate the spec and derive the layout. Read-only.
    pub fn plan(
        &self,
        spec_path: &Path,
        project_name: &str,
        options: &ScaffoldOptions,
    ) -> ScaffoldResult<ScaffoldPlan> {
        validate_project_name(project_name)?;

        let bytes =
            self.filesystem
                .read_file(spec_path)
                .map_err(|e| ApplicationError::SpecUnreadable {
                    path: spec_path.to_path_buf(),
                    reason: e.to_string(),
                })?;
        let spec = ProjectSpec::from_slice(&bytes)?;
        spec.validate(options.duplicate_policy)?;

        let duplicate_apps = spec.duplicate_app_names();
        for name in &duplicate_apps {
            info!(app = %name, "Application declared more than once; its files will be merged");
        }

        let home = options.home_dir.as_deref();
        let ignore = spec
            .gitignore_path
            .as_deref()
            .map(|raw| expand_home(raw, home))
            .and_then(|source| self.read_source(source, "ignore file"));

        let helper_path = options
            .helper
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| spec.helper.clone())
            .map(|raw| expand_home(&raw, home));
        let helper = helper_path
            .clone()
            .filter(|p| p.file_name().is_some())
            .and_then(|source| self.read_source(source, "helper script"));
        let unreadable = helper_path.is_some() && helper.is_none();

        let root = options.output_dir.join(project_name);
        let layout = LayoutPlan::build(root, &spec, ignore, helper)?;
        debug!(entries = layout.entry_count(), "Layout planned");

        let skipped_helper = match (helper_path, layout.helper_conflict()) {
            (Some(path), _) if unreadable => Some(SkippedHelper {
                path,
                reason: "not found or not readable".into(),
            }),
            (Some(path), Some(name)) => Some(SkippedHelper {
                reason: format!("'{}' is already a generated entry", name.display()),
                path,
            }),
            _ => None,
        };
        if let Some(skipped) = &skipped_helper {
            info!(path = %skipped.path.display(), reason = %skipped.reason, "Helper script skipped");
        }

        Ok(ScaffoldPlan {
            project_name: project_name.to_string(),
            spec,
            layout,
            duplicate_apps,
            skipped_helper,
            publish: options.publish.clone(),
        })
    }

    /// Make sure the external clients this job needs are installed.
    pub fn check_tools(&self, publish: bool) -> ScaffoldResult<()> {
        self.vcs.ensure_available()?;
        if publish {
            self.host.ensure_available()?;
        }
        Ok(())
    }

    /// Materialize a plan. Rolls back on failure when `rollback` is set.
    pub fn apply(&self, plan: &ScaffoldPlan, rollback: bool) -> ScaffoldResult<ScaffoldReport> {
        let mut journal = Journal::new();

        match self.apply_steps(plan, &mut journal) {
            Ok(report) => {
                info!(
                    root = %report.root.display(),
                    created = report.created,
                    "Scaffold completed successfully"
                );
                Ok(report)
            }
            Err(e) if rollback && !journal.is_empty() => {
                warn!(error = %e, steps = journal.steps().len(), "Scaffold failed, rolling back");
                let failures = journal.rollback(self.filesystem.as_ref(), self.vcs.as_ref());
                if failures.is_empty() {
                    info!("Rollback successful");
                } else {
                    warn!(failures = failures.len(), "Rollback incomplete");
                }
                Err(e)
            }
            Err(e) => {
                if !journal.is_empty() {
                    warn!(
                        root = %plan.root().display(),
                        "Scaffold failed; partial project left in place"
                    );
                }
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn apply_steps(
        &self,
        plan: &ScaffoldPlan,
        journal: &mut Journal,
    ) -> ScaffoldResult<ScaffoldReport> {
        let root = plan.root();

        // 1. Project directory (reused if present)
        let reused_root = self.filesystem.exists(root);
        self.ensure_dir(root, journal)?;

        // 2-6. Ignore file, placeholders, shared tree, apps, helper
        let mut helper_imported = false;
        for entry in plan.layout.entries() {
            let path = root.join(entry.path());
            match entry {
                PlannedEntry::Directory(_) => self.ensure_dir(&path, journal)?,
                PlannedEntry::EmptyFile(_) => self.ensure_file(&path, journal)?,
                PlannedEntry::CopiedFile {
                    content,
                    executable,
                    source,
                    ..
                } => {
                    self.copy_file(&path, content, journal)?;
                    if *executable {
                        self.filesystem.set_permissions(&path, true)?;
                        helper_imported = true;
                        info!(source = %source.display(), "Helper script imported");
                    }
                }
            }
        }

        // 7. Version control
        let fresh_repository = !self.filesystem.exists(&root.join(".git"));
        if fresh_repository {
            journal.record(Step::InitializedRepository(root.to_path_buf()));
            self.vcs.init(root)?;
        }
        if !fresh_repository {
            journal.record(Step::Staged(root.to_path_buf()));
        }
        self.vcs.stage_all(root)?;
        self.vcs.commit(root, &plan.commit_message(), true)?;
        if !fresh_repository {
            journal.record(Step::Committed(root.to_path_buf()));
        }
        info!(fresh = fresh_repository, "Initial commit created");

        // 8. Publication
        let published = match &plan.publish {
            Some(settings) => Some(self.publish(root, &plan.project_name, settings, journal)?),
            None => {
                debug!("Publishing disabled");
                None
            }
        };

        Ok(ScaffoldReport {
            root: root.to_path_buf(),
            created: journal.created_entries(),
            reused_root,
            helper_imported,
            initialized_repository: fresh_repository,
            published,
        })
    }

    fn publish(
        &self,
        root: &Path,
        name: &str,
        settings: &PublishSettings,
        journal: &mut Journal,
    ) -> ScaffoldResult<String> {
        let request = RepositoryRequest::new(name, settings);
        let slug = request.slug();

        // A re-run of an already published project pushes to the existing remote.
        if self.vcs.has_remote(root, &settings.remote)? {
            info!(remote = %settings.remote, "Remote already configured; skipping repository creation");
        } else {
            self.host.create_repository(root, &request)?;
            journal.record(Step::CreatedRemote(slug.clone()));
            info!(repository = %slug, visibility = %request.visibility, "Remote repository created");
        }

        self.vcs.rename_branch(root, &settings.branch)?;
        self.vcs.push(root, &settings.remote, &settings.branch, true)?;
        info!(remote = %settings.remote, branch = %settings.branch, "Upstream established");

        Ok(slug)
    }

    /// Read a file from outside the project; unreadable sources become `None`.
    fn read_source(&self, source: PathBuf, what: &str) -> Option<CopiedSource> {
        match self.filesystem.read_file(&source) {
            Ok(content) => Some(CopiedSource { source, content }),
            Err(e) => {
                debug!(path = %source.display(), error = %e, "{what} not readable");
                None
            }
        }
    }

    /// `mkdir -p`, journaling every directory that did not exist.
    fn ensure_dir(&self, path: &Path, journal: &mut Journal) -> ScaffoldResult<()> {
        if self.filesystem.exists(path) {
            return Ok(());
        }

        let mut missing: Vec<&Path> = path
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !self.filesystem.exists(p))
            .collect();
        missing.reverse();
        for dir in missing {
            journal.record(Step::CreatedDirectory(dir.to_path_buf()));
        }

        self.filesystem.create_dir_all(path)
    }

    /// `touch`: create if absent, keep existing content.
    fn ensure_file(&self, path: &Path, journal: &mut Journal) -> ScaffoldResult<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent, journal)?;
        }
        if self.filesystem.exists(path) {
            return Ok(());
        }
        journal.record(Step::CreatedFile(path.to_path_buf()));
        self.filesystem.touch(path)
    }

    /// `cp`: replace content, remembering what was there.
    fn copy_file(&self, path: &Path, content: &[u8], journal: &mut Journal) -> ScaffoldResult<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent, journal)?;
        }
        if self.filesystem.exists(path) {
            let previous = self.filesystem.read_file(path)?;
            journal.record(Step::ReplacedFile {
                path: path.to_path_buf(),
                previous,
            });
        } else {
            journal.record(Step::CreatedFile(path.to_path_buf()));
        }
        self.filesystem.write_file(path, content)
    }
}
