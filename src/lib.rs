//! Filemod - restructure codebases with path rules
//!
//! A filemod turns a root directory into a list of file system commands
//! (delete, move, copy, create), either from a declarative rule document or
//! from any type implementing [`Transform`], and can then apply them.

pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod rules;
pub mod transform;

pub use command::Command;
pub use config::DeclarativeConfig;
pub use discovery::{DiskLister, FileLister, VirtualLister};
pub use error::{Error, Result};
pub use executor::{DiskFs, ExecutionSummary, FileSystem, MemoryFs, execute_commands};
pub use transform::{DeclarativeTransform, Transform};

/// Build the transform for a transform file.
///
/// Only declarative documents can be loaded from disk; imperative transforms
/// are types implementing [`Transform`] and are passed to [`run`] directly.
pub async fn load_transform(path: &std::path::Path) -> Result<DeclarativeTransform> {
    let config = DeclarativeConfig::load(path).await?;
    DeclarativeTransform::new(config)
}

/// Compute the commands for `root`, and apply them unless `dry_run` is set
pub async fn run(
    transform: &dyn Transform,
    root: &std::path::Path,
    lister: &dyn FileLister,
    fs: &dyn FileSystem,
    dry_run: bool,
) -> Result<(Vec<Command>, Option<ExecutionSummary>)> {
    let commands = transform.transform(root, lister).await?;

    if dry_run {
        return Ok((commands, None));
    }

    let summary = execute_commands(&commands, fs).await?;
    Ok((commands, Some(summary)))
}
