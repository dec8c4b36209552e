//! Rule scope filtering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IconizeError;

/// Which kind of entries a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    #[default]
    Everything,
    Files,
    Folders,
}

/// Concrete type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl ScopeKind {
    /// Whether a rule with this scope may apply to an entry of `kind`.
    pub fn is_compatible(self, kind: EntryKind) -> bool {
        match self {
            Self::Everything => true,
            Self::Files => kind == EntryKind::File,
            Self::Folders => kind == EntryKind::Folder,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Everything => "everything",
            Self::Files => "files",
            Self::Folders => "folders",
        }
    }
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Free-function form of [`ScopeKind::is_compatible`].
pub fn is_compatible(scope: ScopeKind, kind: EntryKind) -> bool {
    scope.is_compatible(kind)
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = IconizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "everything" | "all" => Ok(Self::Everything),
            "files" | "file" => Ok(Self::Files),
            "folders" | "folder" => Ok(Self::Folders),
            _ => Err(IconizeError::InvalidScope {
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for EntryKind {
    type Err = IconizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "folder" | "dir" | "directory" => Ok(Self::Folder),
            _ => Err(IconizeError::InvalidEntryKind {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_always_compatible() {
        assert!(is_compatible(ScopeKind::Everything, EntryKind::File));
        assert!(is_compatible(ScopeKind::Everything, EntryKind::Folder));
    }

    #[test]
    fn test_files_and_folders() {
        assert!(is_compatible(ScopeKind::Files, EntryKind::File));
        assert!(!is_compatible(ScopeKind::Files, EntryKind::Folder));
        assert!(is_compatible(ScopeKind::Folders, EntryKind::Folder));
        assert!(!is_compatible(ScopeKind::Folders, EntryKind::File));
    }

    #[test]
    fn test_parse_scope() {
        assert_eq!("files".parse::<ScopeKind>().unwrap(), ScopeKind::Files);
        assert_eq!(" Folders ".parse::<ScopeKind>().unwrap(), ScopeKind::Folders);
        assert!(matches!(
            "symlinks".parse::<ScopeKind>(),
            Err(IconizeError::InvalidScope { .. })
        ));
    }

    #[test]
    fn test_scope_serde_lowercase() {
        let json = serde_json::to_string(&ScopeKind::Folders).unwrap();
        assert_eq!(json, "\"folders\"");
        let scope: ScopeKind = serde_json::from_str("\"everything\"").unwrap();
        assert_eq!(scope, ScopeKind::Everything);
    }
}
