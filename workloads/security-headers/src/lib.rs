//! Viewer-response function that sets security headers on every response.
//!
//! The platform hands over a response event; the function overwrites six
//! security headers with fixed values and returns the response otherwise
//! untouched:
//!
//! - `strict-transport-security`
//! - `x-content-type-options`
//! - `x-frame-options`
//! - `x-xss-protection`
//! - `referrer-policy`
//! - `content-security-policy`
//!
//! `handler` is the bare merge. `Runtime` wraps it with event decoding and
//! one structured log line per invocation.

use edge_core::{EdgeFunction, EdgeResponse, EventResult, RequestId, ResponseEvent};
use edge_observability::{LogFormat, LogLevel, StructuredLogger};
use edge_security::{ApplyReport, SecurityHeadersFunction};

pub use edge_security::{handler, SECURITY_HEADERS};

/// Invocation wrapper used by hosts that exchange events as JSON.
#[derive(Debug, Clone)]
pub struct Runtime {
    function: SecurityHeadersFunction,
    log_level: LogLevel,
    log_format: LogFormat,
}

impl Runtime {
    /// Create a runtime applying the fixed security header table.
    pub fn new() -> Self {
        Self {
            function: SecurityHeadersFunction::new(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
        }
    }

    /// Set minimum log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Process one decoded event.
    pub fn invoke(&self, event: ResponseEvent) -> EdgeResponse {
        self.process(event).0
    }

    /// Process one decoded event and report which headers changed.
    pub fn process(&self, event: ResponseEvent) -> (EdgeResponse, ApplyReport) {
        let request_id = event.request_id().unwrap_or_else(RequestId::generate);
        let logger = StructuredLogger::new(request_id)
            .with_function(self.function.manifest().name.clone())
            .with_min_level(self.log_level)
            .with_format(self.log_format);

        let (response, report) = self.function.process(event);

        let mut entry = logger
            .info_builder("applied security headers")
            .field_i64("inserted", report.inserted.len() as i64)
            .field_i64("overwritten", report.overwritten.len() as i64);
        if let Some(status) = response.status_code() {
            entry = entry.field_i64("status", i64::from(status));
        }
        entry.emit();

        if !report.overwritten.is_empty() {
            logger
                .debug_builder("replaced upstream header values")
                .field_list("headers", &report.overwritten)
                .emit();
        }

        (response, report)
    }

    /// Decode an event from JSON, process it, and encode the response.
    pub fn invoke_json(&self, input: &str) -> EventResult<String> {
        let event = ResponseEvent::from_json(input)?;
        let response = self.invoke(event);
        Ok(serde_json::to_string(&response)?)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
