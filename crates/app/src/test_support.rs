//! In-memory port doubles for unit tests.

use repopack_ports::{
    FileSystemDirEntry, FileSystemEntryKind, FileSystemPort, LogEvent, LogFields, LogLevel,
    LoggerPort, SafeRelativePath,
};
use repopack_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Flat map of relative paths to bytes; directories are implied.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<String, Vec<u8>>,
    unreadable: BTreeSet<String>,
}

impl MemoryFileSystem {
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_owned(), bytes.into());
        self
    }

    /// Reads of `path` (file or directory) fail with `permission_denied`.
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_owned());
        self
    }

    fn guard(&self, path: &SafeRelativePath) -> Result<()> {
        if self.unreadable.contains(path.as_str()) {
            return Err(
                ErrorEnvelope::expected(ErrorCode::permission_denied(), "permission denied")
                    .with_metadata("path", path.as_str()),
            );
        }
        Ok(())
    }

    fn bytes(&self, file: &SafeRelativePath) -> Result<Vec<u8>> {
        self.guard(file)?;
        self.files.get(file.as_str()).cloned().ok_or_else(|| {
            ErrorEnvelope::expected(ErrorCode::not_found(), "file not found")
                .with_metadata("path", file.as_str())
        })
    }
}

impl FileSystemPort for MemoryFileSystem {
    fn read_dir(&self, _root: &Path, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        self.guard(dir)?;
        let prefix = if dir.is_root() {
            String::new()
        } else {
            format!("{}/", dir.as_str())
        };

        let mut children: BTreeMap<String, FileSystemEntryKind> = BTreeMap::new();
        for path in self.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((name, _)) => {
                    children.insert(name.to_owned(), FileSystemEntryKind::Directory);
                },
                None => {
                    children.insert(rest.to_owned(), FileSystemEntryKind::File);
                },
            }
        }

        if children.is_empty() && !dir.is_root() {
            return Err(ErrorEnvelope::expected(ErrorCode::not_found(), "directory not found")
                .with_metadata("path", dir.as_str()));
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| FileSystemDirEntry {
                name: name.into_boxed_str(),
                kind,
            })
            .collect())
    }

    fn read_file_text(&self, _root: &Path, file: &SafeRelativePath) -> Result<Box<str>> {
        let bytes = self.bytes(file)?;
        String::from_utf8(bytes)
            .map(String::into_boxed_str)
            .map_err(|_| {
                ErrorEnvelope::expected(ErrorCode::invalid_data(), "file is not valid UTF-8")
                    .with_metadata("path", file.as_str())
            })
    }

    fn read_file_bytes(&self, _root: &Path, file: &SafeRelativePath) -> Result<Vec<u8>> {
        self.bytes(file)
    }
}

/// Logger that records every event, including those from child loggers.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl RecordingLogger {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Event names recorded at `level`, in emission order.
    pub fn names_at(&self, level: LogLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .map(|event| event.event.into_string())
            .collect()
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(self.clone())
    }
}
