//! Explicit settings handed to the scaffolding and commit jobs.
//!
//! Identity and publishing targets are passed in here rather than being
//! picked up from whatever the surrounding shell happens to have configured.
//! Credentials themselves are handed to the adapters at construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";

/// Author/committer identity for commits made by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl GitIdentity {
    /// Build an identity only when both halves are present.
    pub fn from_parts(name: Option<String>, email: Option<String>) -> Option<Self> {
        match (name, email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some(Self { name, email })
            }
            _ => None,
        }
    }
}

/// Visibility of a newly created remote repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Internal,
}

impl Visibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "internal" => Ok(Self::Internal),
            other => Err(DomainError::InvalidSetting(format!(
                "unknown repository visibility: {other}"
            ))),
        }
    }
}

/// Where and how the generated project is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    /// Account or organisation; `None` means the authenticated user.
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub remote: String,
    pub branch: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            owner: None,
            visibility: Visibility::default(),
            remote: DEFAULT_REMOTE.into(),
            branch: DEFAULT_BRANCH.into(),
        }
    }
}

/// Request passed to the repository host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    pub name: String,
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub remote: String,
}

impl RepositoryRequest {
    pub fn new(name: impl Into<String>, settings: &PublishSettings) -> Self {
        Self {
            name: name.into(),
            owner: settings.owner.clone(),
            visibility: settings.visibility,
            remote: settings.remote.clone(),
        }
    }

    /// `owner/name` or just `name`.
    pub fn slug(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}/{}", self.name),
            None => self.name.clone(),
        }
    }
}
