//! User-to-role assignment documents.
//!
//! A users document lists accounts and the catalog roles they should hold:
//!
//! ```json
//! {"users": [{"username": "app", "password": "...", "display_name": "App",
//!             "roles": [{"role": "data_reader"}]}]}
//! ```
//!
//! Validation is local: every entry must be complete, every role must exist
//! in the catalog, and bucket-scoped roles need a bucket to bind to.
//! Passwords are checked for presence and then dropped.

use serde::Deserialize;

use super::{DomainError, RoleCatalog, RoleScope};

#[derive(Debug, Deserialize)]
struct RoleRef {
    role: String,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    username: Option<String>,
    password: Option<String>,
    roles: Option<Vec<RoleRef>>,
    display_name: Option<String>,
}

/// Parsed but unvalidated users document.
#[derive(Debug, Deserialize)]
pub struct UsersDocument {
    #[serde(default)]
    users: Vec<UserEntry>,
}

impl UsersDocument {
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::MalformedUsers(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// A catalog role bound for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRole {
    pub role: String,
    pub scope: RoleScope,
    /// Set for bucket-scoped roles only.
    pub bucket: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAssignment {
    pub username: String,
    /// Falls back to the username.
    pub display_name: String,
    pub roles: Vec<AssignedRole>,
}

impl RoleCatalog {
    /// Resolve every user's roles against this catalog.
    ///
    /// Fails on the first problem, in document order.
    pub fn validate_assignments(
        &self,
        doc: &UsersDocument,
        bucket: Option<&str>,
    ) -> Result<Vec<UserAssignment>, DomainError> {
        if doc.users.is_empty() {
            return Err(DomainError::NoUsers);
        }
        let bucket = bucket.map(str::trim).filter(|b| !b.is_empty());

        doc.users
            .iter()
            .enumerate()
            .map(|(index, entry)| self.resolve_user(index, entry, bucket))
            .collect()
    }

    fn resolve_user(
        &self,
        index: usize,
        entry: &UserEntry,
        bucket: Option<&str>,
    ) -> Result<UserAssignment, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidUser {
            index,
            reason: reason.to_string(),
        };

        let username = entry
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| invalid("missing \"username\""))?;
        if entry.password.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(&format!("user '{username}' has no \"password\"")));
        }
        let refs = entry
            .roles
            .as_ref()
            .ok_or_else(|| invalid(&format!("user '{username}' has no \"roles\"")))?;

        let roles = refs
            .iter()
            .map(|r| {
                let def = self
                    .get(&r.role)
                    .map_err(|_| DomainError::UnassignableRole {
                        user: username.to_string(),
                        role: r.role.clone(),
                    })?;
                let bound = if def.scope.requires_bucket() {
                    let name = bucket.ok_or_else(|| DomainError::MissingBucket {
                        user: username.to_string(),
                        role: def.role.clone(),
                    })?;
                    Some(name.to_string())
                } else {
                    None
                };
                Ok(AssignedRole {
                    role: def.role.clone(),
                    scope: def.scope,
                    bucket: bound,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(UserAssignment {
            username: username.to_string(),
            display_name: entry
                .display_name
                .clone()
                .unwrap_or_else(|| username.to_string()),
            roles,
        })
    }
}
