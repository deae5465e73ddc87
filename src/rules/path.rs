//! POSIX path decomposition

use std::path::{Path, PathBuf};

/// A path split into the parts the rules operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// `/` for absolute paths, empty for relative ones
    pub root: String,

    /// Directory names between the root and the file
    pub directory_segments: Vec<String>,

    /// Base name without the extension
    pub file_root: String,

    /// Extension including the leading dot, or empty
    pub extension: String,
}

impl ParsedPath {
    /// Split a POSIX path. Empty segments from repeated separators are dropped.
    pub fn parse(path: &str) -> Self {
        let (root, rest) = match path.strip_prefix('/') {
            Some(rest) => ("/", rest),
            None => ("", path),
        };

        let rest = rest.trim_end_matches('/');
        let (dir, base) = match rest.rfind('/') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => ("", rest),
        };

        // A leading dot marks a hidden file, not an extension.
        let (file_root, extension) = match base.rfind('.') {
            Some(idx) if idx > 0 && base != ".." => (&base[..idx], &base[idx..]),
            _ => (base, ""),
        };

        Self {
            root: root.to_string(),
            directory_segments: split_segments(dir),
            file_root: file_root.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Base name including the extension
    pub fn base(&self) -> String {
        format!("{}{}", self.file_root, self.extension)
    }

    /// Rebuild the path from its parts
    pub fn to_path_string(&self) -> String {
        join_posix(&self.root, &self.directory_segments, &self.base())
    }
}

/// Resolve `.` and `..` segments lexically, without touching the disk
pub fn normalize(path: &Path) -> PathBuf {
    PathBuf::from(ParsedPath::parse(&path.to_string_lossy()).to_path_string())
}

fn split_segments(dir: &str) -> Vec<String> {
    dir.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a root, directory names and a base name, resolving `.` and `..`
pub(crate) fn join_posix(root: &str, dirs: &[String], base: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(dirs.len() + 1);

    for segment in dirs
        .iter()
        .flat_map(|d| d.split('/'))
        .chain(base.split('/'))
    {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if root.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{}{}", root, joined)
    }
}
