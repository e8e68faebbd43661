//! Static access-control reference data.
//!
//! The catalog maps a role identifier to its metadata. Nothing in the
//! scaffolding pipeline consumes it; it is exposed for tooling that assigns
//! roles later (and through `stackgen roles`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

const BUILTIN_CATALOG: &str = include_str!("../../data/roles.json");

/// Whether a role applies cluster-wide or to a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleScope {
    Cluster,
    Bucket,
}

impl RoleScope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Bucket => "bucket",
        }
    }

    /// Bucket-scoped roles need a bucket name when they are assigned.
    pub const fn requires_bucket(&self) -> bool {
        matches!(self, Self::Bucket)
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cluster" => Ok(Self::Cluster),
            "bucket" => Ok(Self::Bucket),
            other => Err(DomainError::InvalidSetting(format!(
                "unknown role scope: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub role: String,
    #[serde(rename = "type")]
    pub scope: RoleScope,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    roles: BTreeMap<String, RoleDefinition>,
}

/// Immutable role table, ordered by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: BTreeMap<String, RoleDefinition>,
}

impl RoleCatalog {
    /// The catalog bundled with the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let doc: CatalogDocument =
            serde_json::from_str(text).map_err(|e| DomainError::MalformedCatalog(e.to_string()))?;
        Ok(Self { roles: doc.roles })
    }

    pub fn get(&self, id: &str) -> Result<&RoleDefinition, DomainError> {
        self.roles
            .get(id)
            .ok_or_else(|| DomainError::UnknownRole(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleDefinition)> {
        self.roles.iter().map(|(id, def)| (id.as_str(), def))
    }

    pub fn by_scope(&self, scope: RoleScope) -> impl Iterator<Item = (&str, &RoleDefinition)> {
        self.iter().filter(move |(_, def)| def.scope == scope)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = RoleCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let admin = catalog.get("admin").unwrap();
        assert_eq!(admin.scope, RoleScope::Cluster);
    }

    #[test]
    fn builtin_ids_match_role_names() {
        let catalog = RoleCatalog::builtin().unwrap();
        for (id, def) in catalog.iter() {
            assert_eq!(id, def.role, "catalog key and role name differ");
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn iteration_is_sorted_by_id() {
        let catalog = RoleCatalog::builtin().unwrap();
        let ids: Vec<_> = catalog.iter().map(|(id, _)| id.to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn scope_filter() {
        let catalog = RoleCatalog::from_json(
            r#"{"roles": {
                "a": {"role": "a", "type": "bucket", "description": "A"},
                "b": {"role": "b", "type": "cluster", "description": "B"}
            }}"#,
        )
        .unwrap();

        let bucket: Vec<_> = catalog.by_scope(RoleScope::Bucket).map(|(id, _)| id).collect();
        assert_eq!(bucket, vec!["a"]);
        assert!(RoleScope::Bucket.requires_bucket());
        assert!(!RoleScope::Cluster.requires_bucket());
    }

    #[test]
    fn unknown_role_is_not_found() {
        let catalog = RoleCatalog::builtin().unwrap();
        assert!(matches!(
            catalog.get("no_such_role"),
            Err(DomainError::UnknownRole(_))
        ));
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        assert!(matches!(
            RoleCatalog::from_json(r#"{"roles": {"x": {"role": "x", "type": "galaxy", "description": ""}}}"#),
            Err(DomainError::MalformedCatalog(_))
        ));
    }
}
