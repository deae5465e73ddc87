//! Compiles a declarative document into rule sets

use super::{CompiledRules, Condition, DeleteRule, Replacement, Rule};
use crate::config::{DeclarativeConfig, DeclarativeRule, FILE_ROOT_PLACEHOLDER};
use crate::error::{Error, Result};
use tracing::debug;

/// The only document version this engine understands
pub const SUPPORTED_VERSION: u32 = 1;

/// Validate a document and compile its delete, replace and copy rules
pub fn compile(config: &DeclarativeConfig) -> Result<CompiledRules> {
    if config.version != SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion(config.version));
    }

    if !config.posix {
        return Err(Error::PosixOnly);
    }

    let delete_rules = config
        .delete_rules
        .as_ref()
        .and_then(|rules| rules.file_root.as_ref())
        .map(|roots| {
            roots
                .iter()
                .map(|root| DeleteRule::FileRootEqual(root.clone()))
                .collect()
        })
        .unwrap_or_default();

    let replace_rules = compile_rules(config.replace_rules.as_deref());
    let copy_rules = compile_rules(config.copy_rules.as_deref());

    if !replace_rules.is_empty() && !copy_rules.is_empty() {
        return Err(Error::ConflictingRuleSets);
    }

    Ok(CompiledRules {
        delete_rules,
        replace_rules,
        copy_rules,
    })
}

fn compile_rules(rules: Option<&[DeclarativeRule]>) -> Vec<Rule> {
    rules
        .unwrap_or_default()
        .iter()
        .filter_map(compile_rule)
        .collect()
}

fn compile_rule(rule: &DeclarativeRule) -> Option<Rule> {
    match rule {
        DeclarativeRule::ReplaceDirectoryName(from, to) => Some(Rule::ReplaceDirName {
            from: from.clone(),
            to: to.clone(),
        }),

        DeclarativeRule::AppendDirectoryName(name, condition) => {
            // Older documents carry guards other than fileRootNot; those rules are no-ops.
            let Some(value) = condition.file_root_not.as_ref().filter(|v| !v.is_empty()) else {
                debug!("Dropping appendDirectoryName '{}' without a fileRootNot guard", name);
                return None;
            };

            let replacement = if name == FILE_ROOT_PLACEHOLDER {
                Replacement::FileRoot
            } else {
                Replacement::Literal(name.clone())
            };

            Some(Rule::AppendDirName {
                condition: Condition::FileRootNotEqual(value.clone()),
                replacement,
            })
        }

        DeclarativeRule::ReplaceFileRoot(value) => Some(Rule::ReplaceFileRoot(value.clone())),
    }
}
