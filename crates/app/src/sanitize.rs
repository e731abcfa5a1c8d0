//! File sanitization: classify, decode, transform.
//!
//! Each candidate is read twice: once as UTF-8 text to classify it, then as
//! raw bytes for encoding detection. Binary files never reach the decoder.

use crate::diagnostics::{emit, emit_error};
use rayon::prelude::*;
use repopack_domain::{
    FileOutcome, FileProcessingError, SanitizeOptions, SanitizedFile, TransformError, transform,
    validate_options,
};
use repopack_ports::{
    EncodingDetectorPort, EncodingGuess, FileSystemPort, LogLevel, LoggerPort, SafeRelativePath,
    TextDecoderPort, log_field,
};
use repopack_shared::{ErrorCode, ErrorEnvelope, Result};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Dependencies for the sanitization pipeline.
#[derive(Clone)]
pub struct SanitizeDeps {
    /// Filesystem adapter.
    pub filesystem: Arc<dyn FileSystemPort>,
    /// Statistical encoding detector.
    pub detector: Arc<dyn EncodingDetectorPort>,
    /// Label-driven decoder.
    pub decoder: Arc<dyn TextDecoderPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Failure of an aborting batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// Options requested an unimplemented stage; no file was read.
    #[error(transparent)]
    Options(#[from] TransformError),
    /// The first file that failed, in candidate order.
    #[error(transparent)]
    File(#[from] FileProcessingError),
}

impl From<SanitizeError> for ErrorEnvelope {
    fn from(error: SanitizeError) -> Self {
        match error {
            SanitizeError::Options(error) => error.into(),
            SanitizeError::File(error) => error.into(),
        }
    }
}

/// Classify a file as binary.
///
/// The file is read in full as UTF-8: a read failure, invalid UTF-8, or a
/// NUL byte all mean binary. Text in other encodings is therefore treated as
/// binary here; the decoder never sees it.
pub fn is_binary(deps: &SanitizeDeps, root: &Path, file: &SafeRelativePath) -> bool {
    match deps.filesystem.read_file_text(root, file) {
        Ok(text) => text.contains('\0'),
        Err(error) => {
            emit_error(
                deps.logger.as_ref(),
                LogLevel::Trace,
                "sanitize.file.binary",
                "text read failed; classifying as binary",
                Some(log_field("path", file.as_str())),
                &error,
            );
            true
        },
    }
}

/// Detect the encoding of `bytes` and decode them.
///
/// Without a confident guess the bytes are decoded as UTF-8. Malformed input
/// under the chosen encoding is an error, never an empty result.
pub fn decode_bytes(deps: &SanitizeDeps, path: &str, bytes: &[u8]) -> Result<String> {
    let guess = deps.detector.detect(bytes);
    let label = EncodingGuess::effective_label(guess.as_ref());

    let mut fields = log_field("path", path);
    fields.insert("encoding".into(), label.into());
    fields.insert(
        "confident".into(),
        guess.as_ref().is_some_and(|guess| guess.confident).into(),
    );
    emit(
        deps.logger.as_ref(),
        LogLevel::Trace,
        "sanitize.encoding.detected",
        "encoding selected",
        Some(fields),
    );

    deps.decoder.decode(bytes, label)
}

/// Run the pipeline on one candidate.
///
/// Options are validated again here; batch entry points validate them before
/// touching the filesystem.
pub fn sanitize_file(
    deps: &SanitizeDeps,
    root: &Path,
    path: &str,
    options: SanitizeOptions,
) -> FileOutcome {
    let logger = deps.logger.as_ref();
    let file = match SafeRelativePath::new(path) {
        Ok(file) if file.is_root() => {
            let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "path names the root")
                .with_metadata("path", path);
            return FileOutcome::Failed(FileProcessingError::new(path, error));
        },
        Ok(file) => file,
        Err(error) => return FileOutcome::Failed(FileProcessingError::new(path, error)),
    };

    emit(
        logger,
        LogLevel::Trace,
        "sanitize.file.start",
        "sanitizing file",
        Some(log_field("path", path)),
    );

    if let Err(error) = validate_options(options) {
        return FileOutcome::Failed(FileProcessingError::new(path, error));
    }

    if is_binary(deps, root, &file) {
        emit(
            logger,
            LogLevel::Debug,
            "sanitize.file.binary",
            "skipping binary file",
            Some(log_field("path", path)),
        );
        return FileOutcome::SkippedBinary { path: path.into() };
    }

    let content = deps
        .filesystem
        .read_file_bytes(root, &file)
        .and_then(|bytes| decode_bytes(deps, path, &bytes))
        .and_then(|decoded| transform(&decoded, options).map_err(ErrorEnvelope::from));
    let content = match content {
        Ok(content) => content,
        Err(error) => return FileOutcome::Failed(FileProcessingError::new(path, error)),
    };

    if content.is_empty() {
        emit(
            logger,
            LogLevel::Debug,
            "sanitize.file.empty",
            "skipping empty file",
            Some(log_field("path", path)),
        );
        return FileOutcome::SkippedEmpty { path: path.into() };
    }

    let mut fields = log_field("path", path);
    fields.insert("chars".into(), content.chars().count().into());
    emit(
        logger,
        LogLevel::Trace,
        "sanitize.file.done",
        "file sanitized",
        Some(fields),
    );

    FileOutcome::Included(SanitizedFile {
        path: path.into(),
        content: content.into_boxed_str(),
    })
}

/// Sanitize candidates in order, aborting on the first failure.
///
/// Comment removal is rejected before any file is read.
#[tracing::instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn sanitize_files<S: AsRef<str>>(
    deps: &SanitizeDeps,
    root: &Path,
    paths: &[S],
    options: SanitizeOptions,
) -> std::result::Result<Vec<SanitizedFile>, SanitizeError> {
    validate_options(options)?;

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(record) = sanitize_file(deps, root, path.as_ref(), options).into_result()? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Sanitize every candidate and report one outcome each.
///
/// A failing file does not stop its siblings. Invalid options still fail
/// the whole call before any I/O.
#[tracing::instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn sanitize_file_outcomes<S: AsRef<str>>(
    deps: &SanitizeDeps,
    root: &Path,
    paths: &[S],
    options: SanitizeOptions,
) -> std::result::Result<Vec<FileOutcome>, TransformError> {
    validate_options(options)?;

    Ok(paths
        .iter()
        .map(|path| sanitize_file(deps, root, path.as_ref(), options))
        .collect())
}

/// Parallel [`sanitize_files`]: records keep candidate order and the
/// reported failure is the first one in candidate order.
#[tracing::instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn sanitize_files_parallel<S: AsRef<str> + Sync>(
    deps: &SanitizeDeps,
    root: &Path,
    paths: &[S],
    options: SanitizeOptions,
) -> std::result::Result<Vec<SanitizedFile>, SanitizeError> {
    validate_options(options)?;

    let outcomes: Vec<FileOutcome> = paths
        .par_iter()
        .map(|path| sanitize_file(deps, root, path.as_ref(), options))
        .collect();

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if let Some(record) = outcome.into_result()? {
            records.push(record);
        }
    }
    Ok(records)
}
