//! Structured logging with request context.

use std::fmt;
use std::str::FromStr;

use edge_core::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Error parsing a log level or format name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown log {kind}: {value}")]
pub struct ParseLogError {
    kind: &'static str,
    value: String,
}

impl FromStr for LogLevel {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogError {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    /// Function name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Microseconds since logger creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            _ => Err(ParseLogError {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Structured logger with request context.
///
/// Entries are written to stderr, which the edge platform captures.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    function: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl StructuredLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            function: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Set the function name.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether entries at `level` are emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Build the entry that would be emitted, or `None` if filtered out.
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: Map<String, Value>,
    ) -> Option<LogEntry> {
        if !self.enabled(level) {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            function: self.function.clone(),
            fields,
            elapsed_us: Some(self.elapsed_us()),
        })
    }

    /// Render an entry in the configured format.
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        }
    }

    fn log(&self, level: LogLevel, message: &str, fields: Map<String, Value>) {
        if let Some(entry) = self.entry(level, message, fields) {
            eprintln!("{}", self.render(&entry));
        }
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Get elapsed time since logger creation, saturating at `u64::MAX`.
    pub fn elapsed_us(&self) -> u64 {
        micros(self.start_time.elapsed())
    }
}

fn micros(elapsed: std::time::Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: Map<String, Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add a list-of-strings field.
    pub fn field_list(mut self, key: &str, values: &[String]) -> Self {
        self.fields.insert(key.to_string(), Value::from(values.to_vec()));
        self
    }

    /// Build the entry without emitting it.
    pub fn build(self) -> Option<LogEntry> {
        self.logger.entry(self.level, &self.message, self.fields)
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("req-1")).with_function("security-headers")
    }

    #[test]
    fn test_level_filtering() {
        let logger = logger().with_min_level(LogLevel::Warn);
        assert!(logger.entry(LogLevel::Info, "skipped", Map::new()).is_none());
        assert!(logger.entry(LogLevel::Error, "kept", Map::new()).is_some());
    }

    #[test]
    fn test_json_entry() {
        let entry = logger()
            .info_builder("applied security headers")
            .field_i64("inserted", 6)
            .field("status", "200")
            .build()
            .unwrap();

        let value: Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["request_id"], "req-1");
        assert_eq!(value["function"], "security-headers");
        assert_eq!(value["inserted"], 6);
        assert_eq!(value["status"], "200");
    }

    #[test]
    fn test_human_entry() {
        let logger = logger().with_format(LogFormat::Human);
        let entry = LogBuilder::new(&logger, LogLevel::Warn, "overwrote headers")
            .field_list("overwritten", &["x-frame-options".to_string()])
            .build()
            .unwrap();

        let line = logger.render(&entry);
        assert!(line.starts_with("[WARN] overwrote headers"));
        assert!(line.ends_with(r#"overwritten=["x-frame-options"]"#));
    }

    #[test]
    fn test_elapsed_saturates() {
        assert_eq!(micros(std::time::Duration::from_micros(1500)), 1500);
        assert_eq!(micros(std::time::Duration::MAX), u64::MAX);
        assert!(logger().elapsed_us() < 60_000_000);
    }

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
