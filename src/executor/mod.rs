//! Command executor - applies commands to a file system, one at a time

mod disk;
mod memory;

pub use disk::DiskFs;
pub use memory::MemoryFs;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::rules::normalize;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Byte source opened by [`FileSystem::open_read`]
pub type ReadStream = Box<dyn AsyncRead + Send + Unpin>;

/// Byte sink opened by [`FileSystem::open_write`]
pub type WriteStream = Box<dyn AsyncWrite + Send + Unpin>;

/// File system operations the executor needs
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Remove a file
    async fn unlink(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and its parents; no-op when it exists
    async fn mkdir_all(&self, path: &Path) -> io::Result<()>;

    /// Open a file for reading
    async fn open_read(&self, path: &Path) -> io::Result<ReadStream>;

    /// Open a file for writing, creating or truncating it
    async fn open_write(&self, path: &Path) -> io::Result<WriteStream>;

    /// Write a whole file. The parent directory must exist.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Outcome of a completed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub deleted: usize,
    pub moved: usize,
    pub copied: usize,
    pub created: usize,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.deleted + self.moved + self.copied + self.created
    }

    fn record(&mut self, command: &Command) {
        match command {
            Command::Delete { .. } => self.deleted += 1,
            Command::Move { .. } => self.moved += 1,
            Command::Copy { .. } => self.copied += 1,
            Command::Create { .. } => self.created += 1,
        }
    }
}

/// Execute commands in order, stopping at the first failure.
///
/// Commands applied before a failure stay applied.
pub async fn execute_commands(commands: &[Command], fs: &dyn FileSystem) -> Result<ExecutionSummary> {
    let mut summary = ExecutionSummary::default();

    for command in commands {
        execute_command(command, fs).await?;
        summary.record(command);
    }

    debug!("Executed {} commands", summary.total());
    Ok(summary)
}

/// Execute a single command
pub async fn execute_command(command: &Command, fs: &dyn FileSystem) -> Result<()> {
    match command {
        Command::Delete { path } => {
            info!("Deleting {}", path.display());
            fs.unlink(path)
                .await
                .map_err(|e| Error::io("delete", path, e))?;
        }

        Command::Move { from_path, to_path } | Command::Copy { from_path, to_path } => {
            let moving = matches!(command, Command::Move { .. });
            if normalize(from_path) == normalize(to_path) {
                return Err(Error::SameSourceAndDestination {
                    op: command.kind(),
                    path: from_path.clone(),
                });
            }

            if moving {
                info!("Moving {} -> {}", from_path.display(), to_path.display());
            } else {
                info!("Copying {} -> {}", from_path.display(), to_path.display());
            }

            copy_file(fs, from_path, to_path).await?;

            // The source goes only once every byte reached the destination.
            if moving {
                fs.unlink(from_path)
                    .await
                    .map_err(|e| Error::io("remove moved file", from_path, e))?;
            }
        }

        Command::Create { path } => {
            // Unlike move and copy, the parent directory is not created here.
            info!("Creating {}", path.display());
            fs.write_file(path, b"")
                .await
                .map_err(|e| Error::io("create", path, e))?;
        }
    }

    Ok(())
}

async fn copy_file(fs: &dyn FileSystem, from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.mkdir_all(parent)
            .await
            .map_err(|e| Error::io("create directory", parent, e))?;
    }

    let mut reader = fs
        .open_read(from)
        .await
        .map_err(|e| Error::io("open", from, e))?;
    let mut writer = fs
        .open_write(to)
        .await
        .map_err(|e| Error::io("open for writing", to, e))?;

    let bytes = tokio::io::copy(&mut reader, &mut writer)
        .await
        .map_err(|e| Error::io("copy to", to, e))?;
    writer
        .shutdown()
        .await
        .map_err(|e| Error::io("finish writing", to, e))?;

    debug!("Copied {} bytes to {}", bytes, to.display());
    Ok(())
}
