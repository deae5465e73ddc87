//! Commands - the file system operations a transform asks for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One intended file system operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Remove a file
    Delete { path: PathBuf },

    /// Copy a file, then remove the source
    Move { from_path: PathBuf, to_path: PathBuf },

    /// Copy a file, keeping the source
    Copy { from_path: PathBuf, to_path: PathBuf },

    /// Create an empty file
    Create { path: PathBuf },
}

impl Command {
    pub fn delete(path: impl Into<PathBuf>) -> Self {
        Command::Delete { path: path.into() }
    }

    pub fn move_file(from_path: impl Into<PathBuf>, to_path: impl Into<PathBuf>) -> Self {
        Command::Move {
            from_path: from_path.into(),
            to_path: to_path.into(),
        }
    }

    pub fn copy(from_path: impl Into<PathBuf>, to_path: impl Into<PathBuf>) -> Self {
        Command::Copy {
            from_path: from_path.into(),
            to_path: to_path.into(),
        }
    }

    pub fn create(path: impl Into<PathBuf>) -> Self {
        Command::Create { path: path.into() }
    }

    /// Lowercase name of the command kind
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Delete { .. } => "delete",
            Command::Move { .. } => "move",
            Command::Copy { .. } => "copy",
            Command::Create { .. } => "create",
        }
    }

}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Delete { path } => write!(f, "delete {}", path.display()),
            Command::Create { path } => write!(f, "create {}", path.display()),
            Command::Move { from_path, to_path } => {
                write!(f, "move {} -> {}", from_path.display(), to_path.display())
            }
            Command::Copy { from_path, to_path } => {
                write!(f, "copy {} -> {}", from_path.display(), to_path.display())
            }
        }
    }
}
