//! Local pack orchestration: config, ignore rules, scan, sanitize, write.

use crate::observability::observability_from_env;
use crate::output::render_output;
use crate::wiring::LocalDeps;
use crate::InfraResult;
use repopack_app::{build_ignore_filter, sanitize_files_parallel, scan_repository};
use repopack_config::{PackEnv, ValidatedPackConfig, load_pack_config_for_root};
use repopack_domain::SanitizedFile;
use repopack_ports::{LoggerPort, log_field};
use repopack_shared::ErrorEnvelope;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Inputs for one pack run.
#[derive(Debug, Clone, Default)]
pub struct PackRequest {
    /// Repository root.
    pub root: PathBuf,
    /// Explicit config file; `repopack.config.json` under the root otherwise.
    pub config_path: Option<PathBuf>,
    /// Partial config JSON applied over the file config.
    pub overrides_json: Option<String>,
}

/// One entry of the largest-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFile {
    /// Path relative to the root.
    pub path: Box<str>,
    /// Character count of the sanitized content.
    pub chars: usize,
}

/// Result of a pack run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSummary {
    /// Files written to the document.
    pub total_files: usize,
    /// Sum of sanitized character counts.
    pub total_chars: usize,
    /// Where the document was written.
    pub output_path: PathBuf,
    /// Largest files by character count, largest first.
    pub top_files: Vec<TopFile>,
}

impl PackSummary {
    /// Summarize sanitized records.
    #[must_use]
    pub fn from_records(
        records: &[SanitizedFile],
        output_path: PathBuf,
        top_files_length: usize,
    ) -> Self {
        let mut sizes: Vec<TopFile> = records
            .iter()
            .map(|record| TopFile {
                path: record.path.clone(),
                chars: record.content.chars().count(),
            })
            .collect();
        let total_chars = sizes.iter().map(|file| file.chars).sum();

        sizes.sort_by(|a, b| b.chars.cmp(&a.chars).then_with(|| a.path.cmp(&b.path)));
        sizes.truncate(top_files_length);

        Self {
            total_files: records.len(),
            total_chars,
            output_path,
            top_files: sizes,
        }
    }
}

/// Run a pack with process env overrides and env-selected logging.
pub fn run_pack_local(request: &PackRequest) -> InfraResult<PackSummary> {
    let env = PackEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    let observability = observability_from_env();
    run_pack_with_env(request, &env, observability.logger)
}

/// Run a pack with explicit env overrides and logger.
#[tracing::instrument(level = "debug", skip_all, fields(root = %request.root.display()))]
pub fn run_pack_with_env(
    request: &PackRequest,
    env: &PackEnv,
    logger: Option<Arc<dyn LoggerPort>>,
) -> InfraResult<PackSummary> {
    let started = Instant::now();
    let root = normalize_root(&request.root);
    let config = load_pack_config_for_root(
        &root,
        request.config_path.as_deref(),
        request.overrides_json.as_deref(),
        env,
    )?;
    let deps = LocalDeps::new(logger.clone());
    let output_path = resolve_output_path(&root, &config);

    let predicate = build_ignore_filter(&deps.ignore, &root, &config.ignore_settings());
    let mut files = scan_repository(&deps.scan, &root, predicate.as_ref())?;
    if let Some(relative) = relative_to_root(&root, &output_path) {
        files.retain(|file| &**file != relative.as_str());
    }

    let records = sanitize_files_parallel(&deps.sanitize, &root, &files, config.sanitize_options())
        .map_err(ErrorEnvelope::from)?;

    let document = render_output(&records, config.output.header_text.as_deref());
    write_document(&output_path, &document)?;

    let top_files_length = usize::try_from(config.output.top_files_length).unwrap_or(usize::MAX);
    let summary = PackSummary::from_records(&records, output_path, top_files_length);

    if let Some(logger) = logger.as_ref() {
        let mut fields = log_field("totalFiles", summary.total_files);
        fields.insert("totalChars".into(), summary.total_chars.into());
        fields.insert(
            "outputPath".into(),
            summary.output_path.to_string_lossy().into_owned().into(),
        );
        fields.insert(
            "durationMs".into(),
            u64::try_from(started.elapsed().as_millis())
                .unwrap_or(u64::MAX)
                .into(),
        );
        logger.info("pack.done", "pack complete", Some(fields));
    }

    Ok(summary)
}

pub(crate) fn normalize_root(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn resolve_output_path(root: &Path, config: &ValidatedPackConfig) -> PathBuf {
    let configured = Path::new(&*config.output.file_path);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(segments.join("/"))
}

fn write_document(path: &Path, document: &str) -> InfraResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| ErrorEnvelope::io_at(error, parent))?;
    }
    std::fs::write(path, document).map_err(|error| ErrorEnvelope::io_at(error, path))
}
