//! CLI configuration.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use edge_observability::{LogFormat, LogLevel};
use edge_security::{HeaderPolicy, FUNCTION_NAME};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Function metadata.
    #[serde(default)]
    pub function: FunctionConfig,

    /// Logging configuration for function invocations.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Header audit configuration.
    #[serde(default)]
    pub check: CheckConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    /// Parse config content; `path` selects JSON or TOML by extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Policy used by `edge check`: the security header table plus any
    /// headers listed under `[check.require]`.
    pub fn audit_policy(&self) -> Result<HeaderPolicy> {
        self.check
            .require
            .iter()
            .try_fold(HeaderPolicy::baseline(), |policy, (name, value)| {
                policy
                    .with_header(name, value)
                    .with_context(|| format!("Invalid entry in [check.require]: {}", name))
            })
    }
}

/// Function metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Function name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Function version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_name() -> String {
    FUNCTION_NAME.to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level of function log entries.
    #[serde(default = "default_level")]
    pub level: LogLevel,

    /// Log entry format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Header audit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Additional headers a response must carry, with exact values.
    #[serde(default)]
    pub require: BTreeMap<String, String>,
}

/// Generate a default edge.toml config file.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# Edge function configuration

[function]
name = "{name}"
version = "0.1.0"

[logging]
# trace, debug, info, warn, error
level = "info"
# json or human
format = "json"

[check.require]
# "permissions-policy" = "camera=(), microphone=()"
"#,
        name = name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.function.name, FUNCTION_NAME);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.check.require.is_empty());
    }

    #[test]
    fn test_generated_config_parses() {
        let content = generate_default_config("cdn-headers");
        let config = CliConfig::parse("edge.toml", &content).unwrap();
        assert_eq!(config.function.name, "cdn-headers");
        assert_eq!(config.audit_policy().unwrap(), HeaderPolicy::baseline());
    }

    #[test]
    fn test_parse_toml() {
        let config = CliConfig::parse(
            "edge.toml",
            r#"
[logging]
level = "debug"
format = "human"

[check.require]
"Permissions-Policy" = "camera=()"
"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Human);

        let policy = config.audit_policy().unwrap();
        assert_eq!(policy.len(), 7);
        assert_eq!(policy.get("permissions-policy"), Some("camera=()"));
    }

    #[test]
    fn test_parse_json() {
        let config =
            CliConfig::parse("edge.json", r#"{"function":{"name":"hdrs","version":"2.0.0"}}"#)
                .unwrap();
        assert_eq!(config.function.version, "2.0.0");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_invalid_required_header() {
        let content = "[check.require]\n\"bad name\" = \"x\"\n";
        let config = CliConfig::parse("edge.toml", content).unwrap();
        assert!(config.audit_policy().is_err());
    }
}
