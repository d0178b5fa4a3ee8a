use crate::commands::{print_json, Context};
use crate::util::{load_table, resolve_columns, ColumnArgs};
use anyhow::Result;
use clap::Args;
use dialprep_core::{ColumnMap, ColumnRole};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Serialize)]
struct ColumnItem {
    name: String,
    role: Option<ColumnRole>,
}

#[derive(Debug, Serialize)]
struct ColumnsReport {
    rows: usize,
    columns: Vec<ColumnItem>,
    resolved: ColumnMap,
}

pub fn show_columns(ctx: &Context<'_>, args: ColumnsArgs) -> Result<()> {
    let read = load_table(ctx, &args.file)?;
    let resolved = resolve_columns(ctx, &read, &args.columns)?;

    let columns: Vec<ColumnItem> = read
        .table
        .column_names()
        .iter()
        .map(|name| ColumnItem {
            name: name.clone(),
            role: resolved.role_of(name),
        })
        .collect();

    if ctx.json {
        return print_json(&ColumnsReport {
            rows: read.table.len(),
            columns,
            resolved,
        });
    }

    println!("Columns ({} rows):", read.table.len());
    for column in &columns {
        match column.role {
            Some(role) => println!("- {} [{}]", column.name, role),
            None => println!("- {}", column.name),
        }
    }
    if resolved.phone_column.is_none() {
        println!("No phone column detected; pass --phone-column to choose one.");
    }
    Ok(())
}
