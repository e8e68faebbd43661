//! The declarative project specification.
//!
//! A spec is a JSON document:
//!
//! ```json
//! {
//!   "gitignore": "~/.gitignore_global",
//!   "shared": ["config/", "scripts/bootstrap.sh"],
//!   "apps": [
//!     { "name": "api", "config": "config.yml", "init": "start.sh" }
//!   ]
//! }
//! ```
//!
//! It is parsed once, validated once, and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::{RelativePath, check_path_segment};
use super::DomainError;

/// Parsed specification document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Source of the root `.gitignore`. May start with `~`.
    #[serde(default, rename = "gitignore")]
    pub gitignore_path: Option<String>,

    /// Entries under `shared/`. Trailing `/` marks a directory.
    #[serde(default, rename = "shared")]
    pub shared_resources: Vec<String>,

    #[serde(default)]
    pub apps: Vec<AppSpec>,

    /// Optional helper script copied into the project root.
    #[serde(default)]
    pub helper: Option<String>,
}

/// One application unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    pub name: String,
    pub config: String,
    pub init: String,
}

/// A shared entry after the trailing-separator rule has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedResource {
    Directory(RelativePath),
    File(RelativePath),
}

impl SharedResource {
    /// Classify a raw `shared` entry.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let path = RelativePath::try_new("shared", raw)?;
        if raw.ends_with('/') || raw.ends_with('\\') {
            Ok(Self::Directory(path))
        } else {
            Ok(Self::File(path))
        }
    }

    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Directory(p) | Self::File(p) => p,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

/// What to do when two apps share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Merge the directories and log a warning.
    #[default]
    Warn,
    /// Refuse the spec.
    Reject,
}

impl ProjectSpec {
    /// Parse a spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::MalformedSpec(e.to_string()))
    }

    /// Parse a spec from raw bytes (as read from disk).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::MalformedSpec(e.to_string()))
    }

    /// Validate every path-bearing field.
    ///
    /// Duplicate app names are only an error under [`DuplicatePolicy::Reject`];
    /// callers wanting to warn should use [`Self::duplicate_app_names`].
    pub fn validate(&self, policy: DuplicatePolicy) -> Result<(), DomainError> {
        for raw in &self.shared_resources {
            SharedResource::parse(raw)?;
        }

        for app in &self.apps {
            check_path_segment(&app.name).map_err(|reason| DomainError::InvalidAppName {
                name: app.name.clone(),
                reason,
            })?;
            RelativePath::try_new("config", &app.config)?;
            RelativePath::try_new("init", &app.init)?;
        }

        if policy == DuplicatePolicy::Reject {
            if let Some(name) = self.duplicate_app_names().into_iter().next() {
                return Err(DomainError::DuplicateApp { name });
            }
        }

        Ok(())
    }

    /// Names declared by more than one app, in first-seen order.
    pub fn duplicate_app_names(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut order = Vec::new();
        for app in &self.apps {
            let count = counts.entry(app.name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(app.name.clone());
            }
        }
        order
    }

    /// Shared entries, classified. Assumes [`Self::validate`] passed.
    pub fn shared(&self) -> Result<Vec<SharedResource>, DomainError> {
        self.shared_resources
            .iter()
            .map(|raw| SharedResource::parse(raw))
            .collect()
    }
}
