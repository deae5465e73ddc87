//! Transforms - turn a root directory into a list of commands

mod declarative;

pub use declarative::DeclarativeTransform;

use crate::command::Command;
use crate::discovery::FileLister;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Computes the commands for a directory tree.
///
/// Implementations discover files only through `api` and must not touch the
/// file system themselves; executing the commands is the caller's job.
#[async_trait]
pub trait Transform: Send + Sync {
    async fn transform(&self, root: &Path, api: &dyn FileLister) -> Result<Vec<Command>>;
}
