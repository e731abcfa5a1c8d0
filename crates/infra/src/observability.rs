//! Logger selection for local runs.

use repopack_adapters::{JsonLogger, LogSink, StderrLogSink, TracingLogger};
use repopack_ports::{LogLevel, LoggerPort};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Selects the logger backend: `json`, `tracing` (default), or `off`.
pub const LOG_FORMAT_ENV: &str = "REPOPACK_LOG_FORMAT";
/// Minimum level for the JSON backend: `trace`, `debug`, `info` (default),
/// `warn`, or `error`.
pub const LOG_LEVEL_ENV: &str = "REPOPACK_LOG_LEVEL";

/// Logger backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line on stderr.
    Json,
    /// Forward to the process-wide `tracing` subscriber.
    Tracing,
    /// No diagnostics.
    Off,
}

/// Loggers shared by the use cases of one run.
#[derive(Clone, Default)]
pub struct Observability {
    /// Structured logger, if enabled.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

impl Observability {
    /// Build loggers for a format and minimum level.
    #[must_use]
    pub fn new(format: LogFormat, level: LogLevel) -> Self {
        let logger: Option<Arc<dyn LoggerPort>> = match format {
            LogFormat::Json => {
                let sink: Arc<dyn LogSink> = Arc::new(StderrLogSink);
                Some(Arc::new(JsonLogger::new(sink).with_min_level(level)))
            },
            LogFormat::Tracing => Some(Arc::new(TracingLogger::new())),
            LogFormat::Off => None,
        };
        Self { logger }
    }
}

/// Build loggers from an env map.
pub fn observability_from_map(env: &BTreeMap<String, String>) -> Observability {
    let format = parse_log_format(env.get(LOG_FORMAT_ENV).map(String::as_str));
    let level = parse_log_level(env.get(LOG_LEVEL_ENV).map(String::as_str));
    Observability::new(format, level)
}

/// Build loggers from the process environment.
pub fn observability_from_env() -> Observability {
    let env: BTreeMap<String, String> = [LOG_FORMAT_ENV, LOG_LEVEL_ENV]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_owned(), value)))
        .collect();
    observability_from_map(&env)
}

fn parse_log_format(value: Option<&str>) -> LogFormat {
    let value = value.map(|value| value.trim().to_ascii_lowercase());
    match value.as_deref() {
        Some("json") => LogFormat::Json,
        Some("off" | "none") => LogFormat::Off,
        _ => LogFormat::Tracing,
    }
}

fn parse_log_level(value: Option<&str>) -> LogLevel {
    let value = value.map(|value| value.trim().to_ascii_lowercase());
    match value.as_deref() {
        Some("trace") => LogLevel::Trace,
        Some("debug") => LogLevel::Debug,
        Some("warn") => LogLevel::Warn,
        Some("error") => LogLevel::Error,
        _ => LogLevel::Info,
    }
}
