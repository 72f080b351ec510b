//! `workshop-costing` command: load a saved cost sheet, regenerate its totals
//! and print the payload the sheet's screen would save.

pub mod config;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use workshop_costing::{CostSheet, SavePayload, Summary, TaxRates};

pub use config::Args;

#[derive(Debug, Serialize)]
struct Report<'a> {
    payload: &'a SavePayload,
    summary: &'a Summary,
}

/// Read the document from `path`, or stdin for `None` / `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read cost sheet from {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read cost sheet from stdin")?;
            Ok(buf)
        }
    }
}

/// Regenerate totals for one document and render the output JSON.
pub fn render(args: &Args, rates: &TaxRates, document: &str) -> anyhow::Result<String> {
    let mut sheet = CostSheet::from_json(document).context("failed to decode cost sheet")?;
    if let Some(kind) = args.kind {
        sheet.kind = kind;
    }

    let payload = sheet.save_payload(rates);
    tracing::info!(sheet_id = %sheet.id, kind = ?sheet.kind, "cost sheet totals regenerated");

    let out = if args.summary {
        let summary = sheet.summary(rates);
        to_json(
            &Report {
                payload: &payload,
                summary: &summary,
            },
            args.pretty,
        )?
    } else {
        to_json(&payload, args.pretty)?
    };
    Ok(out)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to encode output")
}

/// Run the command end to end.
pub fn run(args: &Args) -> anyhow::Result<String> {
    let rates = args.tax_rates().context("invalid tax configuration")?;
    let document = read_input(args.input.as_deref())?;
    render(args, &rates, &document)
}
