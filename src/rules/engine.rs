//! Rule engine - applies ordered rules to a parsed path

use super::path::join_posix;
use super::{ParsedPath, Replacement, Rule};
use tracing::trace;

/// Apply rules in order and return the resulting path.
///
/// Each rule sees the file root and directories as left by the rules before
/// it, so `@fileRoot` resolves to the current file root at append time. The
/// extension is never changed.
pub fn transform_path(parsed: &ParsedPath, rules: &[Rule]) -> String {
    let mut file_root = parsed.file_root.clone();
    let mut dirs = parsed.directory_segments.clone();

    for rule in rules {
        match rule {
            Rule::ReplaceDirName { from, to } => {
                for dir in dirs.iter_mut().filter(|dir| dir.as_str() == from.as_str()) {
                    dir.clone_from(to);
                }
            }

            Rule::AppendDirName {
                condition,
                replacement,
            } => {
                if !condition.holds(&file_root) {
                    trace!("Append skipped for file root '{}'", file_root);
                    continue;
                }
                match replacement {
                    Replacement::Literal(value) => dirs.push(value.clone()),
                    Replacement::FileRoot => dirs.push(file_root.clone()),
                }
            }

            Rule::ReplaceFileRoot(value) => file_root.clone_from(value),
        }
    }

    join_posix(
        &parsed.root,
        &dirs,
        &format!("{}{}", file_root, parsed.extension),
    )
}
