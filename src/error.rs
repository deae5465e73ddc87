//! Error types for the filemod engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, compiling, running or applying a filemod
#[derive(Error, Debug)]
pub enum Error {
    /// The document declares a version this engine does not understand
    #[error("This filemod engine supports only version 1 of filemods (got version {0})")]
    UnsupportedVersion(u32),

    /// The document does not opt into POSIX path semantics
    #[error("This filemod engine supports only POSIX-compatible operating systems")]
    PosixOnly,

    /// Both `replaceRules` and `copyRules` are populated
    #[error("You cannot declare both replace and copy rules")]
    ConflictingRuleSets,

    /// An include or exclude glob could not be compiled
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A file system operation failed
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A move or copy whose destination is its own source
    #[error("Cannot {op} {} onto itself", .path.display())]
    SameSourceAndDestination { op: &'static str, path: PathBuf },

    /// The document is not valid YAML for the filemod schema
    #[error("Failed to parse YAML filemod: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid TOML for the filemod schema
    #[error("Failed to parse TOML filemod: {0}")]
    Toml(#[from] toml::de::Error),

    /// The transform file is not a declarative document
    #[error("Unsupported transform file (expected .yml, .yaml or .toml): {}", .0.display())]
    UnsupportedTransformFile(PathBuf),

    /// An embedded document test produced unexpected commands
    #[error("Filemod test #{index} failed: expected {expected}, got {actual}")]
    TestFailed {
        index: usize,
        expected: String,
        actual: String,
    },
}

impl Error {
    /// Wrap an I/O error with the operation and path that produced it
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Whether this error is an I/O error of the given kind
    pub fn is_io_kind(&self, kind: std::io::ErrorKind) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == kind)
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
