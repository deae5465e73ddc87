//! Declarative filemod document schema

use crate::command::Command;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Replacement value that resolves to the file's current root
pub const FILE_ROOT_PLACEHOLDER: &str = "@fileRoot";

/// A declarative filemod document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarativeConfig {
    /// Document format version (only 1 is supported)
    pub version: u32,

    /// Whether paths follow POSIX semantics (must be true)
    pub posix: bool,

    /// Glob selecting the files to process, relative to the root directory
    pub include_pattern: String,

    /// Globs removing files from the include set
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Files to delete, matched by file root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_rules: Option<DeleteRules>,

    /// Rules computing a new path; matched files are moved
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub replace_rules: Option<Vec<DeclarativeRule>>,

    /// Rules computing a new path; matched files are copied
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub copy_rules: Option<Vec<DeclarativeRule>>,

    /// Expected commands for single files, checked by `filemod check`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<DocumentTest>,
}

/// Delete strategies. Only `fileRoot` is understood; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_root: Option<Vec<String>>,
}

/// One path rule as written in the document, a single-key map such as
/// `replaceFileRoot: page`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarativeRule {
    /// `replaceDirectoryName: [from, to]`
    ReplaceDirectoryName(String, String),

    /// `appendDirectoryName: [name-or-@fileRoot, { fileRootNot: value }]`
    AppendDirectoryName(String, AppendCondition),

    /// `replaceFileRoot: value`
    ReplaceFileRoot(String),
}

/// Guard for `appendDirectoryName`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_root_not: Option<String>,
}

/// A `[kind, fromPath, toPath]` tuple describing the command one file should produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DocumentTest {
    pub expected: Command,
}

impl DocumentTest {
    /// The file the test feeds through the transform
    pub fn input_path(&self) -> &std::path::Path {
        match &self.expected {
            Command::Delete { path } | Command::Create { path } => path,
            Command::Move { from_path, .. } | Command::Copy { from_path, .. } => from_path,
        }
    }
}

impl TryFrom<Vec<String>> for DocumentTest {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let expected = match parts.as_slice() {
            [kind, path] if kind == "delete" => Command::Delete {
                path: PathBuf::from(path),
            },
            [kind, path] if kind == "create" => Command::Create {
                path: PathBuf::from(path),
            },
            [kind, from, to] if kind == "move" => Command::Move {
                from_path: PathBuf::from(from),
                to_path: PathBuf::from(to),
            },
            [kind, from, to] if kind == "copy" => Command::Copy {
                from_path: PathBuf::from(from),
                to_path: PathBuf::from(to),
            },
            _ => {
                return Err(format!(
                    "expected [delete|create, path] or [move|copy, from, to], got {:?}",
                    parts
                ));
            }
        };
        Ok(Self { expected })
    }
}

impl From<DocumentTest> for Vec<String> {
    fn from(test: DocumentTest) -> Self {
        let lossy = |p: &std::path::Path| p.to_string_lossy().to_string();
        match &test.expected {
            Command::Delete { path } => vec!["delete".to_string(), lossy(path)],
            Command::Create { path } => vec!["create".to_string(), lossy(path)],
            Command::Move { from_path, to_path } => {
                vec!["move".to_string(), lossy(from_path), lossy(to_path)]
            }
            Command::Copy { from_path, to_path } => {
                vec!["copy".to_string(), lossy(from_path), lossy(to_path)]
            }
        }
    }
}
