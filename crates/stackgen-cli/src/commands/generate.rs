//! Implementation of the `stackgen generate` command.
//!
//! Responsibility: translate CLI arguments and configuration into
//! [`ScaffoldOptions`], call the core scaffold service, and display results.
//! No business logic lives here.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use stackgen_adapters::{GitCommand, GitHubCli, LocalFilesystem};
use stackgen_core::{
    application::{ScaffoldOptions, ScaffoldPlan, ScaffoldService},
    domain::{DuplicatePolicy, PlannedEntry},
};

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stackgen generate` command.
///
/// Dispatch sequence:
/// 1. Merge flags over configuration into `ScaffoldOptions`
/// 2. Plan: validate name, read and validate the spec (nothing written)
/// 3. Early-exit if `--dry-run`
/// 4. Check that `git` (and `gh` when publishing) are installed
/// 5. Confirm before reusing an existing directory (TTY only)
/// 6. Apply the plan via `ScaffoldService`
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: GenerateArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    // 1. Options
    let options = build_options(&args, config);
    debug!(
        output_dir = %options.output_dir.display(),
        publish = options.publish.is_some(),
        rollback = options.rollback,
        "Options resolved"
    );

    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(GitCommand::new().with_identity(config.identity())),
        Box::new(GitHubCli::new().with_token(config.publish.token.clone())),
    );

    // 2. Plan
    let plan = service.plan(&args.spec, &args.name, &options)?;
    for name in &plan.duplicate_apps {
        output.warning(&format!("App '{name}' is declared more than once; merging"))?;
    }
    if let Some(helper) = &plan.skipped_helper {
        output.warning(&format!(
            "Helper script {} skipped ({}); continuing without it",
            helper.path.display(),
            helper.reason
        ))?;
    }

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        show_plan(&plan, output)?;
        return Ok(());
    }

    // 4. Tools
    service.check_tools(plan.publish.is_some())?;

    // 5. Existing directory
    if plan.root().exists() && !args.yes && output.is_interactive() && !confirm_reuse(&plan)? {
        return Err(CliError::Cancelled);
    }

    // 6. Apply
    output.header(&format!("Creating '{}'...", plan.project_name))?;
    info!(path = %plan.root().display(), "Generation started");

    let spinner = output.spinner(if plan.publish.is_some() {
        "Writing files, committing and publishing..."
    } else {
        "Writing files and committing..."
    });
    let result = service.apply(&plan, options.rollback);
    spinner.finish_and_clear();
    let report = result?;

    output.success(&format!(
        "Project '{}' created at {} ({} new entries)",
        plan.project_name,
        report.root.display(),
        report.created
    ))?;
    if report.helper_imported {
        output.info("Helper script imported")?;
    }
    match &report.published {
        Some(slug) => output.success(&format!("Published to {slug}"))?,
        None => output.info("Publishing skipped")?,
    }

    Ok(())
}

/// Flags win over configuration; configuration wins over defaults.
fn build_options(args: &GenerateArgs, config: &AppConfig) -> ScaffoldOptions {
    let publish = !args.no_publish && config.publish.enabled;

    ScaffoldOptions {
        output_dir: args
            .output
            .clone()
            .or_else(|| config.scaffold.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".")),
        home_dir: dirs::home_dir(),
        helper: args.helper.clone().or_else(|| config.scaffold.helper.clone()),
        duplicate_policy: if args.strict || config.scaffold.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Warn
        },
        rollback: !args.no_rollback && config.scaffold.rollback,
        publish: publish.then(|| config.publish_settings()),
    }
}

fn show_plan(plan: &ScaffoldPlan, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: would create '{}' at {}",
        plan.project_name,
        plan.root().display()
    ))?;
    for entry in plan.layout.entries() {
        let line = match entry {
            PlannedEntry::Directory(path) => format!("  {}/", path.display()),
            PlannedEntry::EmptyFile(path) => format!("  {}", path.display()),
            PlannedEntry::CopiedFile { path, source, .. } => {
                format!("  {}  (from {})", path.display(), source.display())
            }
        };
        output.print(&line)?;
    }
    output.print(&format!("  commit: {}", plan.commit_message()))?;
    match &plan.publish {
        Some(settings) => output.print(&format!(
            "  publish: {} repository, push {}/{}",
            settings.visibility, settings.remote, settings.branch
        ))?,
        None => output.print("  publish: skipped")?,
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm_reuse(plan: &ScaffoldPlan) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} already exists. Add missing files and commit again?",
            plan.root().display()
        ))
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_reuse(_plan: &ScaffoldPlan) -> CliResult<bool> {
    Ok(true)
}
