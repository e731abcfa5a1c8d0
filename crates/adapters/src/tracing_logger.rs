//! Logger adapter that forwards structured events to `tracing`.

use repopack_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::Value;

/// Forwards events to the global `tracing` subscriber.
///
/// The event name becomes the `event` field and structured fields are
/// rendered as one compact JSON object.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Build a logger with no base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        if let Some(extra) = event.fields {
            fields.extend(extra);
        }
        let rendered = render_fields(&fields);
        let error = event.error.as_ref().map(Value::to_string).unwrap_or_default();
        let name = event.event.as_ref();
        let message = event.message.as_ref();

        match event.level {
            LogLevel::Trace => {
                tracing::trace!(event = name, fields = %rendered, error = %error, "{message}");
            },
            LogLevel::Debug => {
                tracing::debug!(event = name, fields = %rendered, error = %error, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(event = name, fields = %rendered, error = %error, "{message}");
            },
            LogLevel::Warn => {
                tracing::warn!(event = name, fields = %rendered, error = %error, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(event = name, fields = %rendered, error = %error, "{message}");
            },
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            base_fields: merged,
        })
    }
}

fn render_fields(fields: &LogFields) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let map: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    Value::Object(map).to_string()
}
