//! List the security header table.

use anyhow::Result;
use edge_security::SECURITY_HEADERS;
use serde::Serialize;

use crate::context::Context;

#[derive(Serialize)]
struct HeaderRow<'a> {
    name: &'a str,
    value: &'a str,
}

/// Run the headers command.
pub async fn run(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let rows: Vec<HeaderRow<'_>> = SECURITY_HEADERS
            .iter()
            .map(|&(name, value)| HeaderRow { name, value })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Security headers set on every response");
    for (name, value) in SECURITY_HEADERS {
        ctx.output.kv(name, value);
    }

    Ok(())
}
