use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{
    column_label, derived_output_path, load_table, resolve_columns, ColumnArgs, PolicyArgs,
};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use dialprep_config::DedupeMode;
use dialprep_core::{
    process, BatchStats, ColumnMap, DedupeBy, OutputField, OutputRecord, PipelineOptions,
};
use dialprep_table::write::write_dialer_csv;
use dialprep_table::{ReadReport, TableFormat};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const OUTPUT_SUFFIX: &str = "DISCADOR";

#[derive(Debug, Args)]
pub struct PrepareArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub columns: ColumnArgs,
    #[command(flatten)]
    pub policy: PolicyArgs,
    #[arg(long, value_enum)]
    pub dedupe: Option<DedupeArg>,
    /// Column whose repeated values are dropped (implies `--dedupe column`)
    #[arg(long)]
    pub reference_column: Option<String>,
    /// Output rows to show after the run
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupeArg {
    None,
    Subscriber,
    Column,
}

#[derive(Debug, Serialize)]
struct PrepareReport<'a> {
    input: String,
    output: String,
    columns: &'a ColumnMap,
    read: &'a ReadReport,
    stats: &'a BatchStats,
    preview: &'a [OutputRecord],
}

pub fn prepare(ctx: &Context<'_>, args: PrepareArgs) -> Result<()> {
    let options = pipeline_options(ctx, &args)?;
    let read = load_table(ctx, &args.file)?;
    let columns = resolve_columns(ctx, &read, &args.columns)?;
    columns.require_phone().with_context(|| {
        format!(
            "detect phone column in {} (columns: {})",
            args.file.display(),
            read.table.column_names().join(", ")
        )
    })?;

    let batch = process(&read.table, &columns, &options).with_context(|| "process contacts")?;
    debug!(
        total_in = batch.stats.total_in,
        total_out = batch.stats.total_out,
        rejected = batch.stats.rejected,
        duplicates_removed = batch.stats.duplicates_removed,
        "batch processed"
    );

    let out = args.out.clone().unwrap_or_else(|| {
        derived_output_path(&args.file, OUTPUT_SUFFIX, TableFormat::Delimited.output_extension())
    });
    let bytes = write_dialer_csv(&batch.records).with_context(|| "serialize dialer file")?;
    fs::write(&out, bytes).with_context(|| format!("write output {}", out.display()))?;

    let preview_rows = args.preview.unwrap_or(ctx.config.output.preview_rows);
    let preview = batch.preview(preview_rows);

    if ctx.json {
        return print_json(&PrepareReport {
            input: args.file.display().to_string(),
            output: out.display().to_string(),
            columns: &columns,
            read: &read.report,
            stats: &batch.stats,
            preview,
        });
    }

    println!(
        "Columns: phone {}, area code {}, name {}",
        column_label(columns.phone_column.as_deref()),
        column_label(columns.area_code_column.as_deref()),
        column_label(columns.name_column.as_deref())
    );
    let stats = &batch.stats;
    println!(
        "Records: {} in, {} out, {} rejected, {} duplicates removed",
        stats.total_in, stats.total_out, stats.rejected, stats.duplicates_removed
    );
    for (reason, count) in &stats.rejections {
        println!("- {}: {}", reason, count);
    }
    if read.report.skipped_rows > 0 {
        println!("Malformed input rows skipped: {}", read.report.skipped_rows);
    }
    if !preview.is_empty() {
        println!("Preview:");
        for record in preview {
            println!(
                "  {}  ({}) {}  {}",
                record.get(OutputField::Id),
                record.get(OutputField::AreaCode1),
                record.get(OutputField::Phone1),
                record.get(OutputField::FirstName)
            );
        }
    }
    println!("Output written to {}", out.display());
    Ok(())
}

fn pipeline_options(ctx: &Context<'_>, args: &PrepareArgs) -> Result<PipelineOptions> {
    let normalize = args.policy.apply(&ctx.config.normalize)?;
    let dedupe = match (args.dedupe, &args.reference_column) {
        (Some(DedupeArg::Column) | None, Some(column)) => DedupeBy::ReferenceColumn(column.clone()),
        (Some(DedupeArg::Column), None) => {
            return Err(invalid_input("--dedupe column requires --reference-column"));
        }
        (Some(_), Some(_)) => {
            return Err(invalid_input(
                "--reference-column only applies to --dedupe column",
            ));
        }
        (Some(DedupeArg::None), None) => DedupeBy::None,
        (Some(DedupeArg::Subscriber), None) => DedupeBy::SubscriberNumber,
        (None, None) => match ctx.config.output.dedupe {
            DedupeMode::None => DedupeBy::None,
            DedupeMode::Subscriber => DedupeBy::SubscriberNumber,
        },
    };

    Ok(PipelineOptions {
        normalize,
        dedupe,
        first_id: ctx.config.output.first_id,
    })
}
