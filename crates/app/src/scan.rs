//! Repository walk filtered by the ignore predicate.

use crate::diagnostics::emit_error;
use repopack_ports::{
    FileSystemEntryKind, FileSystemPort, FileSystemPortExt, IgnorePredicate, LogLevel, LoggerPort,
    SafeRelativePath, log_field,
};
use repopack_shared::Result;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

/// Dependencies for the repository scan.
#[derive(Clone)]
pub struct ScanDeps {
    /// Filesystem adapter.
    pub filesystem: Arc<dyn FileSystemPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Walk `root` breadth-first and return included file paths, sorted.
///
/// Excluded directories are not descended. Unreadable subdirectories are
/// skipped with a warning; an unreadable root is an error.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.display()))]
pub fn scan_repository(
    deps: &ScanDeps,
    root: &Path,
    predicate: &dyn IgnorePredicate,
) -> Result<Vec<Box<str>>> {
    let fs = deps.filesystem.session(root.to_path_buf());
    let mut dirs: VecDeque<SafeRelativePath> = VecDeque::from([SafeRelativePath::root()]);
    let mut files: Vec<Box<str>> = Vec::new();

    while let Some(dir) = dirs.pop_front() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) if dir.is_root() => return Err(error),
            Err(error) => {
                emit_error(
                    deps.logger.as_ref(),
                    LogLevel::Warn,
                    "scan.dir.read_failed",
                    "cannot read directory during scan",
                    Some(log_field("path", dir.as_str())),
                    &error,
                );
                continue;
            },
        };

        let mut sorted = entries;
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in sorted {
            let child = dir.join(&entry.name)?;
            match entry.kind {
                FileSystemEntryKind::Directory => {
                    if predicate.is_entry_included(child.as_str(), true) {
                        dirs.push_back(child);
                    }
                },
                FileSystemEntryKind::File => {
                    if predicate.is_entry_included(child.as_str(), false) {
                        files.push(child.as_str().into());
                    }
                },
                FileSystemEntryKind::Other => {},
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryFileSystem, RecordingLogger};
    use repopack_adapters::GitignoreCompiler;
    use repopack_domain::IgnorePatterns;
    use repopack_ports::IgnoreCompilerPort;
    use repopack_shared::ErrorCode;

    fn scan(
        fs: MemoryFileSystem,
        patterns: &[&str],
        logger: &RecordingLogger,
    ) -> Result<Vec<Box<str>>> {
        let deps = ScanDeps {
            filesystem: Arc::new(fs),
            logger: Some(Arc::new(logger.clone())),
        };
        let patterns: IgnorePatterns = patterns.iter().copied().collect();
        let compiled = GitignoreCompiler::new().compile(&patterns);
        scan_repository(&deps, Path::new("/repo"), compiled.predicate.as_ref())
    }

    fn names(files: &[Box<str>]) -> Vec<&str> {
        files.iter().map(AsRef::as_ref).collect()
    }

    #[test]
    fn whitespace_in_entry_names_survives_the_walk() -> Result<()> {
        let logger = RecordingLogger::default();
        let fs = MemoryFileSystem::default()
            .with_file("notes.txt ", "important")
            .with_file(" docs/a.md", "a");

        let files = scan(fs, &[], &logger)?;

        assert_eq!(names(&files), vec![" docs/a.md", "notes.txt "]);
        Ok(())
    }

    #[test]
    fn returns_sorted_included_files() -> Result<()> {
        let logger = RecordingLogger::default();
        let fs = MemoryFileSystem::default()
            .with_file("src/z.rs", "z")
            .with_file("README.md", "readme")
            .with_file("src/a/b.rs", "b")
            .with_file("debug.log", "noise");

        let files = scan(fs, &["*.log"], &logger)?;

        assert_eq!(names(&files), vec!["README.md", "src/a/b.rs", "src/z.rs"]);
        Ok(())
    }

    #[test]
    fn directory_only_patterns_prune_directories() -> Result<()> {
        let logger = RecordingLogger::default();
        let fs = MemoryFileSystem::default()
            .with_file("target/debug/app", "bin")
            .with_file("src/target", "a file named target")
            .with_file("src/lib.rs", "lib");

        let files = scan(fs, &["target/"], &logger)?;

        assert_eq!(names(&files), vec!["src/lib.rs", "src/target"]);
        Ok(())
    }

    #[test]
    fn unreadable_subdirectory_is_skipped_with_warning() -> Result<()> {
        let logger = RecordingLogger::default();
        let fs = MemoryFileSystem::default()
            .with_file("locked/secret.txt", "secret")
            .with_unreadable("locked")
            .with_file("open.txt", "open");

        let files = scan(fs, &[], &logger)?;

        assert_eq!(names(&files), vec!["open.txt"]);
        assert_eq!(logger.names_at(LogLevel::Warn), vec!["scan.dir.read_failed"]);
        Ok(())
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let logger = RecordingLogger::default();
        let fs = MemoryFileSystem::default().with_unreadable(".");

        let error = scan(fs, &[], &logger).err();

        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::permission_denied())
        );
    }
}
