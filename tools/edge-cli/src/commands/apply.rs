//! Run the function on an event.

use anyhow::{Context as _, Result};
use edge_core::{EdgeResponse, ResponseEvent};
use edge_observability::{LogFormat, LogLevel};
use edge_security::ApplyReport;
use security_headers::Runtime;
use serde_json::json;

use super::ApplyArgs;
use crate::config::CliConfig;
use crate::context::Context;

/// Run the apply command.
pub async fn run(args: ApplyArgs, ctx: &Context) -> Result<()> {
    let input = ctx.read_input(args.input.as_deref()).await?;

    let (level, format) = log_settings(&ctx.config, &args);
    let runtime = Runtime::new()
        .with_log_level(level)
        .with_log_format(format);

    ctx.output.debug(&format!(
        "Applying {} v{} (log level {}, {:?} logs)",
        ctx.config.function.name, ctx.config.function.version, level, format
    ));

    let (response, report) = apply_event(&runtime, &input)?;

    if ctx.output.is_json() {
        if args.report {
            ctx.output.json(&json!({ "response": response, "report": report }));
        } else {
            ctx.output.json(&response);
        }
        return Ok(());
    }

    println!("{}", render(&response, args.pretty)?);

    if args.report {
        ctx.output.header("Header changes");
        if !report.changed() {
            ctx.output.info("Response already carried every security header");
        }
        for name in &report.inserted {
            ctx.output.success(&format!("inserted {}", name));
        }
        for name in &report.overwritten {
            ctx.output.warn(&format!("overwrote {}", name));
        }
        for name in &report.unchanged {
            ctx.output.debug(&format!("already set {}", name));
        }
    }

    Ok(())
}

/// Log level and format for function entries; flags override the config file.
fn log_settings(config: &CliConfig, args: &ApplyArgs) -> (LogLevel, LogFormat) {
    (
        args.log_level.unwrap_or(config.logging.level),
        args.log_format.unwrap_or(config.logging.format),
    )
}

/// Decode an event and run the function on it.
fn apply_event(runtime: &Runtime, input: &str) -> Result<(EdgeResponse, ApplyReport)> {
    let event = ResponseEvent::from_json(input).context("Invalid viewer-response event")?;
    Ok(runtime.process(event))
}

fn render(response: &EdgeResponse, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(rendered)
}
