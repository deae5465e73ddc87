//! Path rules - compiled form of a declarative filemod

mod compiler;
mod condition;
mod engine;
mod path;

pub use compiler::compile;
pub use condition::{Condition, DeleteRule};
pub use engine::transform_path;
pub use path::{ParsedPath, normalize};

/// A single path rewriting step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Rename every directory segment equal to `from`
    ReplaceDirName { from: String, to: String },

    /// Append a directory segment when the condition holds
    AppendDirName {
        condition: Condition,
        replacement: Replacement,
    },

    /// Replace the file root unconditionally
    ReplaceFileRoot(String),
}

/// Value appended by [`Rule::AppendDirName`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// A fixed directory name
    Literal(String),

    /// The file root as it is when the rule runs
    FileRoot,
}

/// Rule sets ready to be applied to discovered files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledRules {
    pub delete_rules: Vec<DeleteRule>,
    pub replace_rules: Vec<Rule>,
    pub copy_rules: Vec<Rule>,
}

impl CompiledRules {
    /// Whether any delete rule selects the given file root
    pub fn should_delete(&self, file_root: &str) -> bool {
        self.delete_rules.iter().any(|rule| rule.matches(file_root))
    }
}
