//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tokio::io::AsyncReadExt;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["edge.toml", ".edge.toml", "edge.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => {
                            tracing::debug!(path = %config_path.display(), "loaded config");
                            return Some(config);
                        }
                        Err(e) => {
                            tracing::warn!(
                                path = %config_path.display(),
                                error = %e,
                                "skipping unreadable config"
                            );
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Read command input from a file, or from stdin when `path` is absent or `-`.
    pub async fn read_input(&self, path: Option<&str>) -> Result<String> {
        match path {
            None | Some("-") => {
                let mut input = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut input)
                    .await
                    .context("Failed to read stdin")?;
                Ok(input)
            }
            Some(path) => {
                let resolved = self.resolve_path(path);
                tokio::fs::read_to_string(&resolved)
                    .await
                    .with_context(|| format!("Failed to read input file: {}", resolved.display()))
            }
        }
    }
}
