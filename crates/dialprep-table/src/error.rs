use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "xlsx")]
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[cfg(feature = "xlsx")]
    #[error("workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("table too large for a worksheet: {rows} rows, {columns} columns")]
    SheetTooLarge { rows: usize, columns: usize },
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("table has no header row")]
    EmptyTable,
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
