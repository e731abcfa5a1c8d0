//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use repopack_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let mut fields = self.base_fields.clone();
        if let Some(extra) = event.fields {
            fields.extend(extra);
        }

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_string(), Value::from(now_epoch_ms()));
        payload.insert(
            "level".to_string(),
            Value::String(event.level.as_str().to_string()),
        );
        payload.insert("event".to_string(), Value::String(event.event.to_string()));
        payload.insert(
            "message".to_string(),
            Value::String(event.message.to_string()),
        );
        if !fields.is_empty() {
            payload.insert("fields".to_string(), fields_to_json(&fields));
        }
        if let Some(error) = event.error {
            payload.insert("error".to_string(), error);
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            sink: Arc::clone(&self.sink),
            base_fields: merged,
            min_level: self.min_level,
        })
    }
}

fn fields_to_json(fields: &LogFields) -> Value {
    let map = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    Value::Object(map)
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::MemoryLogSink;
    use repopack_ports::log_field;
    use serde_json::json;

    fn parse_lines(sink: &MemoryLogSink) -> Result<Vec<Value>, serde_json::Error> {
        sink.take()
            .iter()
            .map(|line| serde_json::from_str(line.trim()))
            .collect()
    }

    #[test]
    fn json_logger_writes_one_line_per_event() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::default());
        let logger = JsonLogger::new(sink.clone());

        logger.log(LogEvent {
            event: "ignore.file.read_failed".into(),
            level: LogLevel::Warn,
            message: "could not read ignore file".into(),
            fields: Some(log_field("file", ".gitignore")),
            error: Some(json!({ "code": "core:permission_denied" })),
        });

        let payloads = parse_lines(&sink)?;
        assert_eq!(payloads.len(), 1);
        let payload = payloads.first().ok_or("missing payload")?;
        assert_eq!(payload.get("level"), Some(&json!("warn")));
        assert_eq!(payload.get("event"), Some(&json!("ignore.file.read_failed")));
        assert_eq!(payload.pointer("/fields/file"), Some(&json!(".gitignore")));
        assert_eq!(
            payload.pointer("/error/code"),
            Some(&json!("core:permission_denied"))
        );
        Ok(())
    }

    #[test]
    fn events_below_min_level_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::default());
        let logger = JsonLogger::new(sink.clone()).with_min_level(LogLevel::Debug);

        logger.trace("sanitize.file.start", "start", None);
        logger.debug("ignore.file.not_found", "missing", None);

        let payloads = parse_lines(&sink)?;
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads.first().and_then(|payload| payload.get("level")),
            Some(&json!("debug"))
        );
        Ok(())
    }

    #[test]
    fn child_logger_merges_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemoryLogSink::default());
        let logger = JsonLogger::new(sink.clone())
            .with_base_fields(log_field("root", "/repo"))
            .with_min_level(LogLevel::Debug);

        let child = logger.child(log_field("path", "src/lib.rs"));
        child.info("sanitize.file.done", "done", Some(log_field("chars", 42)));

        let payloads = parse_lines(&sink)?;
        let payload = payloads.first().ok_or("missing payload")?;
        assert_eq!(payload.pointer("/fields/root"), Some(&json!("/repo")));
        assert_eq!(payload.pointer("/fields/path"), Some(&json!("src/lib.rs")));
        assert_eq!(payload.pointer("/fields/chars"), Some(&json!(42)));
        Ok(())
    }
}
