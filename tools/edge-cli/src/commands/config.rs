//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.info("[function]");
    ctx.output.kv("name", &ctx.config.function.name);
    ctx.output.kv("version", &ctx.config.function.version);

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level.to_string().to_lowercase());
    ctx.output.kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    if !ctx.config.check.require.is_empty() {
        ctx.output.info("[check.require]");
        for (name, value) in &ctx.config.check.require {
            ctx.output.kv(name, value);
        }
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(&ctx.config.function.name);
    fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
