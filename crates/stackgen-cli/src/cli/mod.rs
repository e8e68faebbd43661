//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stackgen",
    bin_name = "stackgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Multi-app project scaffolding from a JSON spec",
    long_about = "Stackgen creates a multi-application project skeleton from a \
                  JSON specification, commits it, and publishes it to GitHub.",
    after_help = "EXAMPLES:\n\
        \x20 stackgen generate stack.json shop\n\
        \x20 stackgen generate stack.json shop --no-publish --output ~/src\n\
        \x20 stackgen commit --root ~/src/shop\n\
        \x20 stackgen roles list --scope bucket\n\
        \x20 stackgen completions bash > /usr/share/bash-completion/completions/stackgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from a specification file.
    #[command(
        visible_alias = "gen",
        about = "Generate a project from a spec",
        after_help = "EXAMPLES:\n\
            \x20 stackgen generate stack.json shop\n\
            \x20 stackgen generate stack.json shop --dry-run\n\
            \x20 stackgen generate stack.json shop --no-publish --strict"
    )]
    Generate(GenerateArgs),

    /// Commit and push pending changes with a dated message.
    #[command(
        about = "Commit and push pending changes",
        after_help = "EXAMPLES:\n\
            \x20 stackgen commit\n\
            \x20 stackgen commit --root ~/src/shop --log-file ~/.cache/stackgen.log\n\
            \x20 # crontab: 0 18 * * * stackgen commit --root ~/src/shop -q"
    )]
    Commit(CommitArgs),

    /// Inspect the bundled role catalog.
    #[command(
        about = "Inspect the role catalog",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stackgen roles list\n\
            \x20 stackgen roles list --scope cluster --format json\n\
            \x20 stackgen roles show data_reader\n\
            \x20 stackgen roles check users.json --bucket orders"
    )]
    Roles(RolesCommands),

    /// Initialise a Stackgen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stackgen init           # default location\n\
            \x20 stackgen init --local   # .stackgen.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackgen completions bash > ~/.local/share/bash-completion/completions/stackgen\n\
            \x20 stackgen completions zsh  > ~/.zfunc/_stackgen\n\
            \x20 stackgen completions fish > ~/.config/fish/completions/stackgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stackgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stackgen config get publish.visibility\n\
            \x20 stackgen config list\n\
            \x20 stackgen config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `stackgen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// JSON specification file.
    #[arg(value_name = "SPEC", help = "Path to the JSON specification")]
    pub spec: PathBuf,

    /// Name of the project directory (and remote repository).
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Helper script copied into the project root.
    #[arg(
        long = "helper",
        value_name = "PATH",
        env = "STACKGEN_HELPER",
        help = "Helper script to copy into the project"
    )]
    pub helper: Option<PathBuf>,

    /// Skip creating and pushing to a remote repository.
    #[arg(long = "no-publish", help = "Do not create a remote repository")]
    pub no_publish: bool,

    /// Leave partial results in place on failure.
    #[arg(long = "no-rollback", help = "Do not undo completed steps on failure")]
    pub no_rollback: bool,

    /// Reject specs that declare the same app twice.
    #[arg(long = "strict", help = "Fail on duplicate app names")]
    pub strict: bool,

    /// Print the plan without writing anything.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Do not ask before reusing an existing directory"
    )]
    pub yes: bool,
}

// ── commit ────────────────────────────────────────────────────────────────────

/// Arguments for `stackgen commit`.
#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Repository to commit in.
    #[arg(
        long = "root",
        value_name = "DIR",
        help = "Repository root (default: current directory)"
    )]
    pub root: Option<PathBuf>,

    /// Remote to push to.
    #[arg(long = "remote", value_name = "NAME", help = "Remote name")]
    pub remote: Option<String>,

    /// Branch to push.
    #[arg(long = "branch", value_name = "NAME", help = "Branch name")]
    pub branch: Option<String>,
}

// ── roles ─────────────────────────────────────────────────────────────────────

/// Subcommands for `stackgen roles`.
#[derive(Debug, Subcommand)]
pub enum RolesCommands {
    /// List roles.
    List {
        /// Only roles of this scope.
        #[arg(long = "scope", value_enum)]
        scope: Option<ScopeFilter>,

        /// Output format.
        #[arg(long = "format", value_enum, default_value = "table")]
        format: RolesFormat,

        /// Read this catalog instead of the bundled one.
        #[arg(long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Show one role.
    Show {
        /// Role identifier, e.g. `data_reader`.
        id: String,

        /// Read this catalog instead of the bundled one.
        #[arg(long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Check a users document against the catalog.
    Check {
        /// JSON file with a `users` array.
        users: PathBuf,

        /// Bucket that bucket-scoped roles are bound to.
        #[arg(long = "bucket", value_name = "NAME", env = "STACKGEN_BUCKET")]
        bucket: Option<String>,

        /// Read this catalog instead of the bundled one.
        #[arg(long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// `--scope` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeFilter {
    Cluster,
    Bucket,
}

/// Output format for `roles list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RolesFormat {
    /// Aligned columns.
    Table,
    /// JSON object keyed by role id.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stackgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.stackgen.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stackgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stackgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `publish.branch`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from(["stackgen", "generate", "spec.json", "shop", "--no-publish"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.spec, PathBuf::from("spec.json"));
                assert_eq!(args.name, "shop");
                assert!(args.no_publish);
                assert!(!args.strict);
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn gen_alias() {
        let cli = Cli::parse_from(["stackgen", "gen", "s.json", "p", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Generate(ref a) if a.dry_run));
    }

    #[test]
    fn generate_requires_spec_and_name() {
        assert!(Cli::try_parse_from(["stackgen", "generate", "spec.json"]).is_err());
    }

    #[test]
    fn roles_list_scope_and_format() {
        let cli = Cli::parse_from([
            "stackgen", "roles", "list", "--scope", "bucket", "--format", "json",
        ]);
        match cli.command {
            Commands::Roles(RolesCommands::List { scope, format, .. }) => {
                assert_eq!(scope, Some(ScopeFilter::Bucket));
                assert_eq!(format, RolesFormat::Json);
            }
            other => panic!("expected roles list, got {other:?}"),
        }
    }

    #[test]
    fn roles_check_takes_users_file_and_bucket() {
        let cli = Cli::parse_from(["stackgen", "roles", "check", "users.json", "--bucket", "orders"]);
        match cli.command {
            Commands::Roles(RolesCommands::Check { users, bucket, file }) => {
                assert_eq!(users, PathBuf::from("users.json"));
                assert_eq!(bucket.as_deref(), Some("orders"));
                assert!(file.is_none());
            }
            other => panic!("expected roles check, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["stackgen", "commit", "-vv", "--log-file", "/tmp/s.log"]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.log_file, Some(PathBuf::from("/tmp/s.log")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stackgen", "--quiet", "--verbose", "commit"]);
        assert!(result.is_err());
    }
}
