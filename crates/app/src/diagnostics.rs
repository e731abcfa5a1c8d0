//! Optional-logger helpers shared by the use cases.

use repopack_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use repopack_shared::ErrorEnvelope;
use std::sync::Arc;

pub(crate) fn emit(
    logger: Option<&Arc<dyn LoggerPort>>,
    level: LogLevel,
    event: &str,
    message: &str,
    fields: Option<LogFields>,
) {
    if let Some(logger) = logger {
        logger.emit(level, event, message, fields);
    }
}

pub(crate) fn emit_error(
    logger: Option<&Arc<dyn LoggerPort>>,
    level: LogLevel,
    event: &str,
    message: &str,
    fields: Option<LogFields>,
    error: &ErrorEnvelope,
) {
    let Some(logger) = logger else {
        return;
    };
    logger.log(LogEvent {
        event: event.into(),
        level,
        message: message.into(),
        fields,
        error: serde_json::to_value(error).ok(),
    });
}
