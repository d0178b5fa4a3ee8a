pub mod error;
pub mod format;
pub mod text;
#[cfg(feature = "xlsx")]
pub mod workbook;
pub mod write;

pub use error::{Result, TableError};
pub use format::TableFormat;

use dialprep_core::RawTable;
use encoding_rs::Encoding;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Warnings kept per read; the skipped-row count stays exact past this.
pub const MAX_WARNINGS: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// `None` sniffs the delimiter from the header line.
    pub delimiter: Option<u8>,
    /// `None` detects a BOM or valid UTF-8 and falls back to latin1.
    pub encoding: Option<&'static Encoding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadReport {
    pub format: TableFormat,
    pub rows: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<String>,
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone)]
pub struct ReadTable {
    pub table: RawTable,
    pub report: ReadReport,
}

pub fn read_path(path: &Path, options: &ReadOptions) -> Result<ReadTable> {
    let format = TableFormat::from_path(path)?;
    let bytes = fs::read(path)?;
    read_format(bytes, format, options)
}

/// Reads raw file contents; `extension` selects the format (`csv`, `xlsx`, ...).
pub fn read_bytes(bytes: Vec<u8>, extension: &str, options: &ReadOptions) -> Result<ReadTable> {
    let format = TableFormat::from_extension(extension)?;
    read_format(bytes, format, options)
}

fn read_format(bytes: Vec<u8>, format: TableFormat, options: &ReadOptions) -> Result<ReadTable> {
    match format {
        TableFormat::Delimited => text::read_delimited(&bytes, options),
        #[cfg(feature = "xlsx")]
        TableFormat::Workbook => workbook::read_workbook(bytes),
        #[cfg(not(feature = "xlsx"))]
        TableFormat::Workbook => Err(TableError::UnsupportedFormat(
            "workbook (built without the xlsx feature)".to_string(),
        )),
    }
}

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| TableError::UnknownEncoding(label.to_string()))
}
