//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.  The
//! CLI layer owns config; the core crate only sees the explicit settings
//! derived from it ([`PublishSettings`], [`GitIdentity`]).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STACKGEN_<SECTION>__<KEY>`, e.g.
//!    `STACKGEN_PUBLISH__TOKEN` or `STACKGEN_GIT__USER_EMAIL`
//! 3. `.stackgen.toml` in the current directory
//! 4. The user config file (`--config`, or the platform config directory)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use stackgen_core::domain::{GitIdentity, PublishSettings, Visibility};

/// Name of the per-directory override file.
pub const LOCAL_CONFIG_FILE: &str = ".stackgen.toml";

const ENV_PREFIX: &str = "STACKGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scaffold: ScaffoldConfig,
    pub git: GitConfig,
    pub publish: PublishConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Where projects are created when `--output` is not given.
    pub output_dir: Option<PathBuf>,
    /// Helper script copied into every new project.
    pub helper: Option<PathBuf>,
    /// Reject duplicate app names.
    pub strict: bool,
    /// Undo completed steps when generation fails.
    pub rollback: bool,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            helper: None,
            strict: false,
            rollback: true,
        }
    }
}

/// Commit identity. Both halves must be set to take effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub branch: String,
    pub remote: String,
    /// Exported to `gh` as `GH_TOKEN`.
    pub token: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        let settings = PublishSettings::default();
        Self {
            enabled: true,
            owner: settings.owner,
            visibility: settings.visibility,
            branch: settings.branch,
            remote: settings.remote,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append logs to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then files, then environment.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let user_file = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(Self::config_path()).required(false),
        };

        config::Config::builder()
            .add_source(defaults)
            .add_source(user_file)
            .add_source(config::File::from(Path::new(LOCAL_CONFIG_FILE)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stackgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stackgen", "stackgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The commit identity, when both name and email are configured.
    pub fn identity(&self) -> Option<GitIdentity> {
        GitIdentity::from_parts(self.git.user_name.clone(), self.git.user_email.clone())
    }

    pub fn publish_settings(&self) -> PublishSettings {
        PublishSettings {
            owner: self.publish.owner.clone(),
            visibility: self.publish.visibility,
            remote: self.publish.remote.clone(),
            branch: self.publish.branch.clone(),
        }
    }

    /// Look up a dotted key for `config get`. Secrets are masked.
    pub fn get(&self, key: &str) -> Option<String> {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        fn path(v: &Option<PathBuf>) -> String {
            v.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        }

        let value = match key {
            "scaffold.output_dir" => path(&self.scaffold.output_dir),
            "scaffold.helper" => path(&self.scaffold.helper),
            "scaffold.strict" => self.scaffold.strict.to_string(),
            "scaffold.rollback" => self.scaffold.rollback.to_string(),
            "git.user_name" => opt(&self.git.user_name),
            "git.user_email" => opt(&self.git.user_email),
            "publish.enabled" => self.publish.enabled.to_string(),
            "publish.owner" => opt(&self.publish.owner),
            "publish.visibility" => self.publish.visibility.to_string(),
            "publish.branch" => self.publish.branch.clone(),
            "publish.remote" => self.publish.remote.clone(),
            "publish.token" => mask(self.publish.token.as_deref()),
            "logging.file" => path(&self.logging.file),
            "output.no_color" => self.output.no_color.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Copy safe to print: the token is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.publish.token.is_some() {
            copy.publish.token = Some(mask(copy.publish.token.as_deref()));
        }
        copy
    }
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => "********".into(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_publish_privately_to_origin_main() {
        let cfg = AppConfig::default();
        assert!(cfg.publish.enabled);
        assert_eq!(cfg.publish.visibility, Visibility::Private);
        assert_eq!(cfg.publish.remote, "origin");
        assert_eq!(cfg.publish.branch, "main");
        assert!(cfg.scaffold.rollback);
        assert!(!cfg.scaffold.strict);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[publish]\nvisibility = \"public\"\nowner = \"acme\"\n\n[scaffold]\nstrict = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.publish.visibility, Visibility::Public);
        assert_eq!(cfg.publish.owner.as_deref(), Some("acme"));
        assert_eq!(cfg.publish.branch, "main");
        assert!(cfg.scaffold.strict);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn identity_needs_both_halves() {
        let mut cfg = AppConfig::default();
        cfg.git.user_name = Some("Bot".into());
        assert!(cfg.identity().is_none());

        cfg.git.user_email = Some("bot@example.com".into());
        assert_eq!(cfg.identity().unwrap().email, "bot@example.com");
    }

    #[test]
    fn token_is_masked() {
        let mut cfg = AppConfig::default();
        cfg.publish.token = Some("ghp_secret".into());
        assert_eq!(cfg.get("publish.token").as_deref(), Some("********"));
        assert_eq!(cfg.redacted().publish.token.as_deref(), Some("********"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(AppConfig::default().get("does.not.exist").is_none());
        assert_eq!(
            AppConfig::default().get("publish.visibility").as_deref(),
            Some("private")
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
