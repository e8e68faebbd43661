//! Implementation of the `stackgen roles` commands.

use std::collections::BTreeMap;
use std::path::Path;

use stackgen_core::domain::{RoleCatalog, RoleDefinition, RoleScope, UserAssignment, UsersDocument};

use crate::{
    cli::{RolesCommands, RolesFormat, ScopeFilter},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: RolesCommands, output: &OutputManager) -> CliResult<()> {
    match cmd {
        RolesCommands::List {
            scope,
            format,
            file,
        } => {
            let catalog = load(file.as_deref())?;
            let roles: Vec<(&str, &RoleDefinition)> = match scope {
                Some(filter) => catalog.by_scope(to_scope(filter)).collect(),
                None => catalog.iter().collect(),
            };
            match format {
                RolesFormat::Table => {
                    output.header(&format!("{} roles", roles.len()))?;
                    for line in table(&roles) {
                        output.print(&line)?;
                    }
                }
                RolesFormat::Json => {
                    let map: BTreeMap<&str, &RoleDefinition> = roles.into_iter().collect();
                    output.data(&to_json(&map)?)?;
                }
            }
        }

        RolesCommands::Show { id, file } => {
            let catalog = load(file.as_deref())?;
            let role = catalog.get(&id)?;
            output.data(&format!("id:          {id}"))?;
            output.data(&format!("role:        {}", role.role))?;
            output.data(&format!("scope:       {}", role.scope))?;
            output.data(&format!("description: {}", role.description))?;
            if role.scope.requires_bucket() {
                output.print("Assign with a bucket name, e.g. data_reader[my-bucket]")?;
            }
        }

        RolesCommands::Check {
            users,
            bucket,
            file,
        } => {
            let catalog = load(file.as_deref())?;
            let text = std::fs::read_to_string(&users).map_err(|e| CliError::UsersUnreadable {
                path: users.clone(),
                source: e,
            })?;
            let doc = UsersDocument::from_json(&text)?;
            let resolved = catalog.validate_assignments(&doc, bucket.as_deref())?;
            for user in &resolved {
                output.data(&describe(user))?;
            }
            output.success(&format!("{} users valid", resolved.len()))?;
        }
    }

    Ok(())
}

fn load(file: Option<&Path>) -> CliResult<RoleCatalog> {
    let catalog = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CliError::CatalogUnreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
            RoleCatalog::from_json(&text)?
        }
        None => RoleCatalog::builtin()?,
    };
    Ok(catalog)
}

fn to_scope(filter: ScopeFilter) -> RoleScope {
    match filter {
        ScopeFilter::Cluster => RoleScope::Cluster,
        ScopeFilter::Bucket => RoleScope::Bucket,
    }
}

fn to_json(map: &BTreeMap<&str, &RoleDefinition>) -> CliResult<String> {
    serde_json::to_string_pretty(map).map_err(|e| CliError::InvalidInput {
        message: format!("Failed to serialise roles: {e}"),
        source: Some(Box::new(e)),
    })
}

/// `name (Display): role, role[bucket]`
fn describe(user: &UserAssignment) -> String {
    let roles: Vec<String> = user
        .roles
        .iter()
        .map(|r| match &r.bucket {
            Some(bucket) => format!("{}[{bucket}]", r.role),
            None => r.role.clone(),
        })
        .collect();
    format!("{} ({}): {}", user.username, user.display_name, roles.join(", "))
}

/// Id, scope, and description in aligned columns.
fn table(roles: &[(&str, &RoleDefinition)]) -> Vec<String> {
    let width = roles.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
    roles
        .iter()
        .map(|(id, role)| {
            format!(
                "  {id:<width$}  {:<7}  {}",
                role.scope.as_str(),
                role.description
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_aligns_ids() {
        let catalog = RoleCatalog::builtin().unwrap();
        let roles: Vec<_> = catalog.iter().collect();
        let lines = table(&roles);
        assert_eq!(lines.len(), catalog.len());

        // Ids may themselves contain "bucket", so look at the fixed offset
        let width = roles.iter().map(|(id, _)| id.len()).max().unwrap();
        let offset = 2 + width + 2;
        for (line, (_, role)) in lines.iter().zip(&roles) {
            assert!(line[offset..].starts_with(role.scope.as_str()), "{line}");
        }
    }

    #[test]
    fn json_is_keyed_by_id() {
        let catalog = RoleCatalog::builtin().unwrap();
        let map: BTreeMap<_, _> = catalog.by_scope(RoleScope::Cluster).collect();
        let value: serde_json::Value = serde_json::from_str(&to_json(&map).unwrap()).unwrap();
        assert_eq!(value["admin"]["type"], "cluster");
        assert!(value.get("data_reader").is_none());
    }

    #[test]
    fn described_user_shows_bound_buckets() {
        let catalog = RoleCatalog::builtin().unwrap();
        let doc = UsersDocument::from_json(
            r#"{"users": [{"username": "app", "password": "pw",
                "roles": [{"role": "admin"}, {"role": "data_reader"}]}]}"#,
        )
        .unwrap();
        let users = catalog.validate_assignments(&doc, Some("orders")).unwrap();
        assert_eq!(describe(&users[0]), "app (app): admin, data_reader[orders]");
    }

    #[test]
    fn catalog_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(
            &path,
            r#"{"roles": {"x": {"role": "x", "type": "bucket", "description": "X"}}}"#,
        )
        .unwrap();
        let catalog = load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);

        assert!(matches!(
            load(Some(&dir.path().join("absent.json"))),
            Err(CliError::CatalogUnreadable { .. })
        ));
    }
}
