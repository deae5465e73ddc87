//! Rule conditions - predicates over a file root

/// Guard deciding whether an append rule fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Holds when the current file root differs from the value
    FileRootNotEqual(String),
}

impl Condition {
    /// Check the condition against the current file root
    pub fn holds(&self, file_root: &str) -> bool {
        match self {
            Condition::FileRootNotEqual(value) => value != file_root,
        }
    }
}

/// Predicate selecting files to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRule {
    /// Matches files whose root equals the value exactly
    FileRootEqual(String),
}

impl DeleteRule {
    pub fn matches(&self, file_root: &str) -> bool {
        match self {
            DeleteRule::FileRootEqual(value) => value == file_root,
        }
    }
}
