//! Transform built from a declarative filemod document

use super::Transform;
use crate::command::Command;
use crate::config::{DeclarativeConfig, DocumentTest};
use crate::discovery::{FileLister, VirtualLister};
use crate::error::{Error, Result};
use crate::rules::{self, CompiledRules, ParsedPath};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Applies compiled delete, replace and copy rules to every discovered file
#[derive(Debug, Clone)]
pub struct DeclarativeTransform {
    include_pattern: String,
    exclude_patterns: Vec<String>,
    rules: CompiledRules,
    tests: Vec<DocumentTest>,
}

impl DeclarativeTransform {
    /// Compile the document's rules. Fails on unsupported or conflicting documents.
    pub fn new(config: DeclarativeConfig) -> Result<Self> {
        let rules = rules::compile(&config)?;
        debug!(
            "Compiled filemod: {} delete, {} replace, {} copy rules",
            rules.delete_rules.len(),
            rules.replace_rules.len(),
            rules.copy_rules.len()
        );

        Ok(Self {
            include_pattern: config.include_pattern,
            exclude_patterns: config.exclude_patterns,
            rules,
            tests: config.tests,
        })
    }

    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Command for a single file, if any
    pub fn command_for(&self, file_path: &Path) -> Option<Command> {
        let path_str = file_path.to_string_lossy();
        let parsed = ParsedPath::parse(&path_str);

        if self.rules.should_delete(&parsed.file_root) {
            return Some(Command::delete(file_path));
        }

        let (rules, moves) = if !self.rules.replace_rules.is_empty() {
            (&self.rules.replace_rules, true)
        } else if !self.rules.copy_rules.is_empty() {
            (&self.rules.copy_rules, false)
        } else {
            return None;
        };

        let new_path = rules::transform_path(&parsed, rules);
        if new_path == path_str {
            trace!("Path unchanged: {}", path_str);
            return None;
        }

        let new_path = PathBuf::from(new_path);
        Some(if moves {
            Command::move_file(file_path, new_path)
        } else {
            Command::copy(file_path, new_path)
        })
    }

    /// Run the document's embedded tests, each against a tree holding only its input file
    pub async fn run_document_tests(&self, root: &Path) -> Result<usize> {
        for (index, test) in self.tests.iter().enumerate() {
            let lister = VirtualLister::single_file(root, test.input_path());
            let commands = self.transform(root, &lister).await?;

            if commands.as_slice() != std::slice::from_ref(&test.expected) {
                let actual = commands
                    .iter()
                    .map(Command::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::TestFailed {
                    index: index + 1,
                    expected: test.expected.to_string(),
                    actual: if actual.is_empty() {
                        "no commands".to_string()
                    } else {
                        actual
                    },
                });
            }
            debug!("Filemod test #{} passed: {}", index + 1, test.expected);
        }

        Ok(self.tests.len())
    }
}

#[async_trait]
impl Transform for DeclarativeTransform {
    async fn transform(&self, _root: &Path, api: &dyn FileLister) -> Result<Vec<Command>> {
        let file_paths = api
            .get_file_paths(&self.include_pattern, &self.exclude_patterns)
            .await?;

        let commands: Vec<Command> = file_paths
            .iter()
            .filter_map(|path| self.command_for(path))
            .collect();

        debug!(
            "{} commands for {} discovered files",
            commands.len(),
            file_paths.len()
        );
        Ok(commands)
    }
}
