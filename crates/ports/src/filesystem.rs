//! Filesystem boundary contract.

use repopack_shared::{ErrorCode, ErrorEnvelope, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A validated, normalized path relative to a repository root.
///
/// Implementations MUST reject absolute paths and traversal (e.g. `..` segments).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeRelativePath(Box<str>);

impl SafeRelativePath {
    /// Validate and normalize an untrusted relative path.
    pub fn new(input: &str) -> Result<Self> {
        let normalized = normalize_relative_path(input)?;
        Ok(Self(normalized.into_boxed_str()))
    }

    /// The repository root itself (`.`).
    #[must_use]
    pub fn root() -> Self {
        Self(".".into())
    }

    /// Borrow the path as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the repository root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.as_str() == "."
    }

    /// Join a single child segment.
    pub fn join(&self, child: &str) -> Result<Self> {
        if self.is_root() {
            Self::new(child)
        } else {
            Self::new(&format!("{}/{child}", self.as_str()))
        }
    }

    /// Resolve against a repository root.
    #[must_use]
    pub fn to_path(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(self.as_str())
        }
    }
}

/// Borrowing filesystem session bound to a repository root.
pub struct FileSystemSession<'a> {
    fs: &'a dyn FileSystemPort,
    root: PathBuf,
}

impl<'a> FileSystemSession<'a> {
    /// Create a borrowing session for a repository root.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystemPort, root: PathBuf) -> Self {
        Self { fs, root }
    }

    /// The repository root this session reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List directory entries relative to the root.
    pub fn read_dir(&self, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        self.fs.read_dir(&self.root, dir)
    }

    /// Read a file as UTF-8 text relative to the root.
    pub fn read_file_text(&self, file: &SafeRelativePath) -> Result<Box<str>> {
        self.fs.read_file_text(&self.root, file)
    }

    /// Read raw file bytes relative to the root.
    pub fn read_file_bytes(&self, file: &SafeRelativePath) -> Result<Vec<u8>> {
        self.fs.read_file_bytes(&self.root, file)
    }
}

/// Extension helpers for filesystem ports.
pub trait FileSystemPortExt {
    /// Create a borrowing session for a repository root.
    fn session(&self, root: PathBuf) -> FileSystemSession<'_>;
}

impl<T> FileSystemPortExt for T
where
    T: FileSystemPort,
{
    fn session(&self, root: PathBuf) -> FileSystemSession<'_> {
        FileSystemSession::new(self, root)
    }
}

impl FileSystemPortExt for Arc<dyn FileSystemPort> {
    fn session(&self, root: PathBuf) -> FileSystemSession<'_> {
        FileSystemSession::new(self.as_ref(), root)
    }
}

fn normalize_relative_path(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(".".to_owned());
    }
    let replaced = input.replace('\\', "/");
    let collapsed = collapse_forward_slashes(&replaced);
    if is_absolute_like(&collapsed) {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "absolute paths are not allowed",
        )
        .with_metadata("path", input));
    }
    let collapsed = collapsed.trim_start_matches("./");
    let collapsed = collapsed.trim_matches('/');

    if collapsed.is_empty() || collapsed == "." {
        return Ok(".".to_owned());
    }

    if collapsed.split('/').any(|segment| segment == "..") {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "path traversal is not allowed",
        )
        .with_metadata("path", input));
    }

    Ok(collapsed.to_owned())
}

fn is_absolute_like(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    matches!(bytes, [drive, b':', b'/', ..] if drive.is_ascii_alphabetic())
}

fn collapse_forward_slashes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_slash = false;

    for ch in input.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        output.push(ch);
    }

    output
}

/// File system entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemEntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Other / unknown.
    Other,
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemDirEntry {
    /// Entry name (single path segment).
    pub name: Box<str>,
    /// Entry kind.
    pub kind: FileSystemEntryKind,
}

/// Boundary contract for filesystem access.
///
/// `root` is an absolute path owned by the caller/infra composition. Every
/// call opens and releases its own handle.
pub trait FileSystemPort: Send + Sync {
    /// List directory entries, sorted by name.
    fn read_dir(&self, root: &Path, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>>;

    /// Read a file as UTF-8 text. Invalid UTF-8 fails with `core:invalid_data`.
    fn read_file_text(&self, root: &Path, file: &SafeRelativePath) -> Result<Box<str>>;

    /// Read raw file bytes.
    fn read_file_bytes(&self, root: &Path, file: &SafeRelativePath) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dots() -> Result<()> {
        assert_eq!(SafeRelativePath::new("./src//lib.rs")?.as_str(), "src/lib.rs");
        assert_eq!(SafeRelativePath::new("src\\main.rs")?.as_str(), "src/main.rs");
        assert!(SafeRelativePath::new("")?.is_root());
        assert!(SafeRelativePath::new("./")?.is_root());
        assert!(SafeRelativePath::new("  ")?.is_root());
        Ok(())
    }

    #[test]
    fn whitespace_in_names_is_kept() -> Result<()> {
        assert_eq!(SafeRelativePath::new("notes.txt ")?.as_str(), "notes.txt ");
        assert_eq!(SafeRelativePath::new(" docs/ a.md")?.as_str(), " docs/ a.md");
        let dir = SafeRelativePath::new("src")?;
        assert_eq!(dir.join(" lib.rs")?.as_str(), "src/ lib.rs");
        Ok(())
    }

    #[test]
    fn rejects_absolute_and_traversal() {
        for input in ["/etc/passwd", "C:/Windows", "../outside", "a/../../b"] {
            let error = SafeRelativePath::new(input).err();
            assert_eq!(
                error.map(|error| error.code),
                Some(ErrorCode::invalid_input()),
                "expected rejection for {input}"
            );
        }
    }

    #[test]
    fn join_builds_child_paths() -> Result<()> {
        let root = SafeRelativePath::root();
        let src = root.join("src")?;
        assert_eq!(src.as_str(), "src");
        assert_eq!(src.join("lib.rs")?.as_str(), "src/lib.rs");
        Ok(())
    }

    #[test]
    fn to_path_resolves_against_root() -> Result<()> {
        let root = Path::new("/repo");
        assert_eq!(SafeRelativePath::root().to_path(root), PathBuf::from("/repo"));
        assert_eq!(
            SafeRelativePath::new("src/a.txt")?.to_path(root),
            PathBuf::from("/repo/src/a.txt")
        );
        Ok(())
    }
}
