//! In-memory file system for previews and tests

use super::{FileSystem, ReadStream, WriteStream};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
    operations: usize,
}

impl Tree {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if parent.parent().is_some() => self.dirs.contains(parent),
            _ => true,
        }
    }
}

/// A file tree held in memory. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and its parent directories
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        {
            let mut tree = self.lock();
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                tree.add_dir_all(parent);
            }
            tree.files.insert(path.to_path_buf(), contents.into());
        }
        self
    }

    /// Add a directory and its parents
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.lock().add_dir_all(path.as_ref());
        self
    }

    /// Make every write to `path` fail
    pub fn fail_writes_to(self, path: impl AsRef<Path>) -> Self {
        self.lock()
            .failing_writes
            .insert(path.as_ref().to_path_buf());
        self
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.lock().files.contains_key(path.as_ref())
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.lock().dirs.contains(path.as_ref())
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    /// Number of file system calls made through [`FileSystem`]
    pub fn operation_count(&self) -> usize {
        self.lock().operations
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> MutexGuard<'_, Tree> {
        let mut tree = self.lock();
        tree.operations += 1;
        tree
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

fn injected_failure(path: &Path) -> io::Error {
    io::Error::other(format!("write to {} failed", path.display()))
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn unlink(&self, path: &Path) -> io::Result<()> {
        self.begin()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    async fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.begin();
        if let Some(file) = path.ancestors().find(|p| tree.files.contains_key(*p)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {}", file.display()),
            ));
        }
        tree.add_dir_all(path);
        Ok(())
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        let contents = self
            .begin()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))?;
        Ok(Box::new(io::Cursor::new(contents)))
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        let mut tree = self.begin();
        if !tree.parent_exists(path) {
            return Err(not_found(path));
        }
        tree.files.insert(path.to_path_buf(), Vec::new());

        Ok(Box::new(MemoryWriter {
            path: path.to_path_buf(),
            buffer: Vec::new(),
            fail: tree.failing_writes.contains(path),
            tree: Arc::clone(&self.tree),
        }))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut tree = self.begin();
        if tree.failing_writes.contains(path) {
            return Err(injected_failure(path));
        }
        if !tree.parent_exists(path) {
            return Err(not_found(path));
        }
        tree.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

/// Buffers writes and stores them in the tree on shutdown
struct MemoryWriter {
    path: PathBuf,
    buffer: Vec<u8>,
    fail: bool,
    tree: Arc<Mutex<Tree>>,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail {
            return Poll::Ready(Err(injected_failure(&self.path)));
        }
        self.buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.fail {
            return Poll::Ready(Err(injected_failure(&this.path)));
        }
        let contents = std::mem::take(&mut this.buffer);
        this.tree
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .files
            .insert(this.path.clone(), contents);
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_write_then_read() {
        let fs = MemoryFs::new().with_dir("/p");

        let mut writer = fs.open_write(Path::new("/p/a.txt")).await.unwrap();
        writer.write_all(b"hello").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut reader = fs.open_read(Path::new("/p/a.txt")).await.unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).await.unwrap();
        assert_eq!(contents, "hello");
        assert_eq!(fs.operation_count(), 2);
    }

    #[tokio::test]
    async fn test_open_write_needs_parent() {
        let fs = MemoryFs::new();
        let err = fs.open_write(Path::new("/p/a.txt")).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_mkdir_all_over_file_fails() {
        let fs = MemoryFs::new().with_file("/p/a", "");
        let err = fs.mkdir_all(Path::new("/p/a/b")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);

        fs.mkdir_all(Path::new("/p/c/d")).await.unwrap();
        assert!(fs.is_dir("/p/c"));
        assert!(fs.is_dir("/p/c/d"));
    }

    #[tokio::test]
    async fn test_clones_share_tree() {
        let fs = MemoryFs::new().with_file("/p/a.txt", "a");
        let other = fs.clone();

        other.unlink(Path::new("/p/a.txt")).await.unwrap();
        assert!(!fs.exists("/p/a.txt"));
        assert!(fs.file_paths().is_empty());
    }
}
