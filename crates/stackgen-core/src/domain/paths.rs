use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to stay below the directory it is joined to.
///
/// Invariant: never absolute, never contains `..`, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor. `field` names the spec field for error messages.
    pub fn try_new(field: &'static str, raw: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidSpecPath {
            field,
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let path = Path::new(raw);
        if raw.trim().is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.is_absolute() || raw.starts_with('/') || raw.starts_with('\\') {
            return Err(invalid("absolute paths are not allowed"));
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("'..' is not allowed")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("absolute paths are not allowed"));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(invalid("path does not name anything"));
        }
        Ok(Self(normalized))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Expand a leading `~` to `home`.
///
/// Only the bare `~` and the `~/` prefix are expanded; `~user` forms and
/// paths without a leading tilde come back unchanged. With no home directory
/// the raw path is returned as-is.
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if raw == "~" => home.to_path_buf(),
        Some(home) => match raw.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    }
}

/// Check that `name` can be used as a single directory name.
///
/// Returns the reason on failure so callers can wrap it in their own error.
pub fn check_path_segment(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".into());
    }
    if name == "." || name == ".." {
        return Err("name cannot be '.' or '..'".into());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("name cannot contain path separators".into());
    }
    if name.contains('\0') {
        return Err("name cannot contain NUL bytes".into());
    }
    Ok(())
}

/// Validate a project name (the root directory of the generated tree).
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    check_path_segment(name).map_err(|reason| DomainError::InvalidProjectName {
        name: name.into(),
        reason,
    })?;
    if name.starts_with('.') {
        return Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_prefix_expands_to_home() {
        let home = Path::new("/home/dev");
        assert_eq!(
            expand_home("~/.gitignore_global", Some(home)),
            PathBuf::from("/home/dev/.gitignore_global")
        );
        assert_eq!(expand_home("~", Some(home)), PathBuf::from("/home/dev"));
    }

    #[test]
    fn non_tilde_paths_are_untouched() {
        let home = Path::new("/home/dev");
        assert_eq!(expand_home("/etc/ignore", Some(home)), PathBuf::from("/etc/ignore"));
        assert_eq!(expand_home("~other/x", Some(home)), PathBuf::from("~other/x"));
        assert_eq!(expand_home("rel/~/x", Some(home)), PathBuf::from("rel/~/x"));
    }

    #[test]
    fn missing_home_leaves_tilde_literal() {
        assert_eq!(expand_home("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn relative_path_normalizes_current_dir() {
        let p = RelativePath::try_new("shared", "./config/").unwrap();
        assert_eq!(p.as_path(), Path::new("config"));
    }

    #[test]
    fn relative_path_rejects_escapes() {
        assert!(RelativePath::try_new("shared", "../etc").is_err());
        assert!(RelativePath::try_new("shared", "a/../../b").is_err());
        assert!(RelativePath::try_new("shared", "/abs").is_err());
        assert!(RelativePath::try_new("shared", "").is_err());
        assert!(RelativePath::try_new("shared", "./").is_err());
    }

    #[test]
    fn path_segment_rules() {
        assert!(check_path_segment("svc").is_ok());
        assert!(check_path_segment("web-ui_2").is_ok());
        assert!(check_path_segment("").is_err());
        assert!(check_path_segment("..").is_err());
        assert!(check_path_segment("a/b").is_err());
        assert!(check_path_segment("a\\b").is_err());
    }

    #[test]
    fn project_name_rejects_hidden_dirs() {
        assert!(validate_project_name("my-project").is_ok());
        assert!(matches!(
            validate_project_name(".hidden"),
            Err(DomainError::InvalidProjectName { .. })
        ));
    }
}
