use crate::commands::{print_json, Context};
use crate::util::{derived_output_path, load_table};
use anyhow::{Context as _, Result};
use clap::Args;
use dialprep_core::dedupe_table;
use dialprep_table::resolve_encoding;
use dialprep_table::write::write_table;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const OUTPUT_SUFFIX: &str = "HIGIENIZADO";

#[derive(Debug, Args)]
pub struct DedupeArgs {
    pub file: PathBuf,
    /// Reference column; the first row of each value is kept
    #[arg(long)]
    pub column: String,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DedupeReport {
    input: String,
    output: String,
    column: String,
    total_before: usize,
    total_after: usize,
    removed: usize,
}

pub fn dedupe(ctx: &Context<'_>, args: DedupeArgs) -> Result<()> {
    let encoding = resolve_encoding(&ctx.config.output.dedupe_encoding)
        .with_context(|| "resolve output encoding")?;
    let read = load_table(ctx, &args.file)?;
    let outcome = dedupe_table(&read.table, &args.column).with_context(|| {
        format!(
            "find column {} (columns: {})",
            args.column,
            read.table.column_names().join(", ")
        )
    })?;

    // Same format as the input.
    let format = read.report.format;
    let out = args.out.clone().unwrap_or_else(|| {
        derived_output_path(&args.file, OUTPUT_SUFFIX, format.output_extension())
    });
    let encoded = write_table(&outcome.table, format, encoding)
        .with_context(|| "serialize cleaned table")?;
    if encoded.lossy {
        warn!(
            encoding = encoding.name(),
            "some characters could not be represented and were escaped"
        );
    }
    fs::write(&out, encoded.bytes).with_context(|| format!("write output {}", out.display()))?;

    if ctx.json {
        return print_json(&DedupeReport {
            input: args.file.display().to_string(),
            output: out.display().to_string(),
            column: args.column,
            total_before: outcome.total_before,
            total_after: outcome.total_after,
            removed: outcome.removed,
        });
    }

    println!("Records before: {}", outcome.total_before);
    println!("Duplicates removed: {}", outcome.removed);
    println!("Output written to {}", out.display());
    Ok(())
}
