//! Audit a response against the header policy.

use anyhow::{bail, Context as _, Result};
use edge_core::{EdgeResponse, ResponseEvent};
use edge_security::{HeaderFinding, HeaderPolicy};
use serde_json::{json, Value};

use super::CheckArgs;
use crate::config::CliConfig;
use crate::context::Context;
use crate::output::status_badge;

/// Run the check command.
pub async fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let input = ctx.read_input(args.input.as_deref()).await?;
    let response = parse_response(&input)?;
    let policy = build_policy(&ctx.config, &args.require)?;

    let findings = policy.audit(&response.headers);

    if ctx.output.is_json() {
        ctx.output.json(&summary(&policy, &findings));
    } else {
        report(ctx, &policy, &findings);
    }

    verdict(&policy, &findings)?;
    ctx.output.success(&format!("All {} header(s) present", policy.len()));
    Ok(())
}

/// Accept either a full viewer-response event or a bare response object.
fn parse_response(input: &str) -> Result<EdgeResponse> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;

    if value.get("response").is_some() {
        let event = ResponseEvent::from_value(value).context("Invalid viewer-response event")?;
        Ok(event.into_response())
    } else {
        EdgeResponse::from_value(value).context("Invalid response object")
    }
}

/// Config policy plus `--require NAME=VALUE` entries, later entries winning.
fn build_policy(config: &CliConfig, require: &[String]) -> Result<HeaderPolicy> {
    let mut policy = config.audit_policy()?;

    for entry in require {
        let (name, value) = entry
            .split_once('=')
            .with_context(|| format!("Expected NAME=VALUE, got '{}'", entry))?;
        policy = policy
            .with_header(name.trim(), value.trim())
            .with_context(|| format!("Invalid --require '{}'", entry))?;
    }

    Ok(policy)
}

fn summary(policy: &HeaderPolicy, findings: &[HeaderFinding]) -> Value {
    json!({
        "passed": findings.is_empty(),
        "checked": policy.len(),
        "findings": findings,
    })
}

/// Fails when the audit found anything, so the process exits non-zero.
fn verdict(policy: &HeaderPolicy, findings: &[HeaderFinding]) -> Result<()> {
    if !findings.is_empty() {
        bail!("{} of {} header(s) failed the check", findings.len(), policy.len());
    }
    Ok(())
}

fn report(ctx: &Context, policy: &HeaderPolicy, findings: &[HeaderFinding]) {
    ctx.output.header("Header check");

    for (name, _) in policy.iter() {
        let line = match findings.iter().find(|f| f.name() == name) {
            Some(finding) => format!("{} {}", status_badge(false), finding),
            None => format!("{} {}", status_badge(true), name),
        };
        ctx.output.list_item(&line);
    }
}
