//! Local filesystem adapter.

use repopack_ports::{FileSystemDirEntry, FileSystemEntryKind, FileSystemPort, SafeRelativePath};
use repopack_shared::{ErrorCode, ErrorEnvelope, Result};
use std::fs;
use std::path::Path;

/// Local filesystem adapter using blocking `std::fs` calls.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    max_file_size_bytes: Option<u64>,
}

impl LocalFileSystem {
    /// Build a filesystem adapter with an optional max file size.
    pub const fn new(max_file_size_bytes: Option<u64>) -> Self {
        Self {
            max_file_size_bytes,
        }
    }

    fn check_file(&self, full_path: &Path, file: &SafeRelativePath) -> Result<()> {
        let metadata = fs::metadata(full_path)
            .map_err(|error| ErrorEnvelope::from(error).with_metadata("path", file.as_str()))?;
        if !metadata.is_file() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "path is not a file",
            )
            .with_metadata("path", file.as_str()));
        }
        if let Some(limit) = self.max_file_size_bytes
            && metadata.len() > limit
        {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "file exceeds max size",
            )
            .with_metadata("path", file.as_str())
            .with_metadata("size_bytes", metadata.len().to_string())
            .with_metadata("max_bytes", limit.to_string()));
        }
        Ok(())
    }
}

impl FileSystemPort for LocalFileSystem {
    fn read_dir(&self, root: &Path, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        let full_path = dir.to_path(root);
        let mut entries = Vec::new();

        for entry in fs::read_dir(&full_path).map_err(ErrorEnvelope::from)? {
            let entry = entry.map_err(ErrorEnvelope::from)?;
            let file_type = entry.file_type().map_err(ErrorEnvelope::from)?;
            let kind = if file_type.is_file() {
                FileSystemEntryKind::File
            } else if file_type.is_dir() {
                FileSystemEntryKind::Directory
            } else {
                FileSystemEntryKind::Other
            };
            let name = entry
                .file_name()
                .to_string_lossy()
                .to_string()
                .into_boxed_str();
            entries.push(FileSystemDirEntry { name, kind });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file_text(&self, root: &Path, file: &SafeRelativePath) -> Result<Box<str>> {
        let full_path = file.to_path(root);
        self.check_file(&full_path, file)?;

        let contents = fs::read_to_string(&full_path)
            .map_err(|error| ErrorEnvelope::from(error).with_metadata("path", file.as_str()))?;
        Ok(contents.into_boxed_str())
    }

    fn read_file_bytes(&self, root: &Path, file: &SafeRelativePath) -> Result<Vec<u8>> {
        let full_path = file.to_path(root);
        self.check_file(&full_path, file)?;

        fs::read(&full_path)
            .map_err(|error| ErrorEnvelope::from(error).with_metadata("path", file.as_str()))
    }
}
