//! File discovery - the listing capability handed to transforms

mod pattern;

pub use pattern::{PathMatcher, expand_braces};

use crate::error::{Error, Result};
use crate::rules::normalize;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lists files under a root directory by include/exclude globs
#[async_trait]
pub trait FileLister: Send + Sync {
    /// Absolute paths of files matching `include` and none of `exclude`,
    /// sorted so repeated calls return the same order
    async fn get_file_paths(&self, include: &str, exclude: &[String]) -> Result<Vec<PathBuf>>;
}

/// Discovers files by walking a directory tree on disk
#[derive(Debug, Clone)]
pub struct DiskLister {
    root: PathBuf,
}

impl DiskLister {
    /// The root may be relative; it is resolved against the working
    /// directory on each listing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileLister for DiskLister {
    async fn get_file_paths(&self, include: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
        let matcher = PathMatcher::new(include, exclude)?;
        let root = resolve_root(&self.root)?;

        let walk_root = root.clone();
        let files = tokio::task::spawn_blocking(move || walkdir(&walk_root))
            .await
            .map_err(|e| Error::io("walk", &root, std::io::Error::other(e)))??;

        let paths = filter_sorted(&root, files, &matcher);
        debug!(
            "Discovered {} files under {} matching {}",
            paths.len(),
            root.display(),
            include
        );
        Ok(paths)
    }
}

/// Make a root directory absolute and free of `.` and `..` segments, so
/// discovered paths compare equal to the paths rules produce
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root).map_err(|e| Error::io("resolve", root, e))?;
    Ok(normalize(&absolute))
}

/// Discovers files from a fixed set of paths without touching the disk
#[derive(Debug, Clone)]
pub struct VirtualLister {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl VirtualLister {
    pub fn new(root: impl Into<PathBuf>, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: paths.into_iter().collect(),
        }
    }

    /// A tree containing only `path`, used to preview what a transform does to one file
    pub fn single_file(root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self::new(root, [path.into()])
    }
}

#[async_trait]
impl FileLister for VirtualLister {
    async fn get_file_paths(&self, include: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
        let matcher = PathMatcher::new(include, exclude)?;
        Ok(filter_sorted(&self.root, self.paths.clone(), &matcher))
    }
}

fn filter_sorted(root: &Path, files: Vec<PathBuf>, matcher: &PathMatcher) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| {
            path.strip_prefix(root)
                .is_ok_and(|relative| matcher.matches(relative))
        })
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Recursively collect all file paths from a directory tree.
fn walkdir(path: &Path) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    walk_recursive(path, &mut result)?;
    Ok(result)
}

fn walk_recursive(path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(path).map_err(|e| Error::io("read directory", path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read directory", path, e))?;
        let ft = entry
            .file_type()
            .map_err(|e| Error::io("stat", entry.path(), e))?;
        if ft.is_symlink() {
            // Skip symlinks to avoid potential loops
            continue;
        }
        if ft.is_dir() {
            walk_recursive(&entry.path(), result)?;
        } else {
            result.push(entry.path());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCLUDE: &str = "**/pages/**/*.{js,jsx,ts,tsx}";

    fn excludes() -> Vec<String> {
        vec!["**/node_modules/**".to_string(), "**/pages/api/**".to_string()]
    }

    #[tokio::test]
    async fn test_virtual_lister_filters_and_sorts() {
        let lister = VirtualLister::new(
            "/opt/project/",
            [
                "/opt/project/pages/index.js",
                "/opt/project/pages/_app.tsx",
                "/opt/project/pages/_document.jsx",
                "/opt/project/pages/[slug]/about.tsx",
                "/opt/project/pages/api/index.ts",
                "/opt/project/node_modules/lib/pages/a/index.ts",
                "/elsewhere/pages/index.ts",
            ]
            .map(PathBuf::from),
        );

        let paths = lister.get_file_paths(INCLUDE, &excludes()).await.unwrap();
        assert_eq!(
            paths,
            [
                "/opt/project/pages/[slug]/about.tsx",
                "/opt/project/pages/_app.tsx",
                "/opt/project/pages/_document.jsx",
                "/opt/project/pages/index.js",
            ]
            .map(PathBuf::from)
        );
    }

    #[tokio::test]
    async fn test_single_file_lister() {
        let lister = VirtualLister::single_file("/opt/project", "/opt/project/pages/blog.tsx");

        let paths = lister.get_file_paths(INCLUDE, &excludes()).await.unwrap();
        assert_eq!(paths, vec![PathBuf::from("/opt/project/pages/blog.tsx")]);

        let paths = lister.get_file_paths("**/*.css", &[]).await.unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_disk_lister() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "pages/index.tsx",
            "pages/[slug]/about.tsx",
            "pages/api/hello.ts",
            "node_modules/x/pages/a.ts",
            "README.md",
        ] {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "").unwrap();
        }

        let lister = DiskLister::new(dir.path());
        let paths = lister.get_file_paths(INCLUDE, &excludes()).await.unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("pages/[slug]/about.tsx"),
                dir.path().join("pages/index.tsx"),
            ]
        );
    }

    #[tokio::test]
    async fn test_disk_lister_normalizes_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pages/blog")).unwrap();
        std::fs::write(dir.path().join("pages/index.tsx"), "").unwrap();

        let lister = DiskLister::new(dir.path().join("pages/blog/../."));
        let paths = lister.get_file_paths("*.tsx", &[]).await.unwrap();

        assert_eq!(paths, vec![dir.path().join("pages/index.tsx")]);
    }

    #[test]
    fn test_resolve_root_is_absolute() {
        let root = resolve_root(Path::new(".")).unwrap();
        assert!(root.is_absolute());
        assert_eq!(root, normalize(&std::env::current_dir().unwrap()));
    }

    #[tokio::test]
    async fn test_disk_lister_missing_root() {
        let lister = DiskLister::new("/nonexistent/filemod/root");
        let err = lister.get_file_paths("**/*", &[]).await.unwrap_err();
        assert!(err.is_io_kind(std::io::ErrorKind::NotFound));
    }
}
