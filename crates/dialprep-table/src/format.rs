use crate::error::{Result, TableError};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Delimited,
    Workbook,
}

impl TableFormat {
    pub fn from_extension(extension: &str) -> Result<Self> {
        let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "txt" | "tsv" => Ok(TableFormat::Delimited),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(TableFormat::Workbook),
            _ => Err(TableError::UnsupportedFormat(extension)),
        }
    }

    /// Extension of files this crate writes in the format. Workbooks are
    /// always written as `.xlsx`.
    pub fn output_extension(self) -> &'static str {
        match self {
            TableFormat::Delimited => "csv",
            TableFormat::Workbook => "xlsx",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }
}
