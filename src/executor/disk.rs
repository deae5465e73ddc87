//! Real file system backed by tokio

use super::{FileSystem, ReadStream, WriteStream};
use async_trait::async_trait;
use std::io;
use std::path::Path;

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

#[async_trait]
impl FileSystem for DiskFs {
    async fn unlink(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;
        Ok(Box::new(file))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}
