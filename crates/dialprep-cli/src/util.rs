use crate::commands::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use dialprep_core::{AreaCode, ColumnMap, ColumnOverrides, NormalizePolicy};
use dialprep_table::{read_path, resolve_encoding, ReadOptions, ReadTable};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit column choices; anything left out is detected from the header.
#[derive(Debug, Args, Default)]
pub struct ColumnArgs {
    #[arg(long)]
    pub phone_column: Option<String>,
    #[arg(long)]
    pub area_code_column: Option<String>,
    #[arg(long)]
    pub name_column: Option<String>,
}

impl ColumnArgs {
    fn overrides(&self) -> ColumnOverrides {
        ColumnOverrides {
            phone: self.phone_column.clone(),
            area_code: self.area_code_column.clone(),
            name: self.name_column.clone(),
        }
    }
}

#[derive(Debug, Args, Default)]
pub struct PolicyArgs {
    /// Accept subscriber numbers starting with 3
    #[arg(long)]
    pub keep_landlines: bool,
    /// Area code for numbers that carry none
    #[arg(long)]
    pub fallback_area_code: Option<String>,
}

impl PolicyArgs {
    pub fn apply(&self, base: &NormalizePolicy) -> Result<NormalizePolicy> {
        let mut policy = base.clone();
        if self.keep_landlines {
            policy.reject_landline_prefix = false;
        }
        if let Some(raw) = &self.fallback_area_code {
            let area_code = AreaCode::new(raw).with_context(|| "parse --fallback-area-code")?;
            policy.fallback_area_code = Some(area_code);
        }
        Ok(policy)
    }
}

pub fn load_table(ctx: &Context<'_>, path: &Path) -> Result<ReadTable> {
    let encoding = ctx
        .config
        .input
        .encoding
        .as_deref()
        .map(resolve_encoding)
        .transpose()
        .with_context(|| "resolve input encoding")?;
    let options = ReadOptions {
        delimiter: ctx.config.input.delimiter,
        encoding,
    };

    let read = read_path(path, &options)
        .with_context(|| format!("read input file {}", path.display()))?;
    debug!(
        path = %path.display(),
        rows = read.report.rows,
        encoding = read.report.encoding.as_deref().unwrap_or("-"),
        delimiter = ?read.report.delimiter,
        "input loaded"
    );
    for warning in &read.report.warnings {
        warn!("{}", warning);
    }
    Ok(read)
}

pub fn resolve_columns(
    ctx: &Context<'_>,
    read: &ReadTable,
    args: &ColumnArgs,
) -> Result<ColumnMap> {
    let columns = ctx
        .config
        .columns
        .resolve_with(read.table.column_names(), &args.overrides())?;
    debug!(
        phone = columns.phone_column.as_deref().unwrap_or("-"),
        area_code = columns.area_code_column.as_deref().unwrap_or("-"),
        name = columns.name_column.as_deref().unwrap_or("-"),
        "columns resolved"
    );
    Ok(columns)
}

/// `lista.xlsx` + `DISCADOR` + `csv` -> `lista_DISCADOR.csv`, next to the input.
pub fn derived_output_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "saida".to_string());
    input.with_file_name(format!("{stem}_{suffix}.{extension}"))
}

pub fn column_label(column: Option<&str>) -> &str {
    column.unwrap_or("(none)")
}
