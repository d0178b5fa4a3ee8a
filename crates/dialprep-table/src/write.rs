use crate::error::{Result, TableError};
use crate::format::TableFormat;
use dialprep_core::{OutputField, OutputRecord, RawTable};
use encoding_rs::{Encoding, UTF_8};

pub const OUTPUT_DELIMITER: u8 = b';';
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Dialer import file: `;`-separated, UTF-8 with BOM, fixed 34-column header.
pub fn write_dialer_csv(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .from_writer(UTF8_BOM.to_vec());
    writer.write_record(OutputField::header())?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer
        .into_inner()
        .map_err(|err| TableError::Io(err.into_error()))
}

#[derive(Debug, Clone)]
pub struct EncodedTable {
    pub bytes: Vec<u8>,
    /// Some characters had no representation in the target encoding.
    pub lossy: bool,
}

/// Writes a raw table back out `;`-separated in `encoding`. UTF-8 output
/// carries a BOM; legacy code pages do not.
pub fn write_table_csv(table: &RawTable, encoding: &'static Encoding) -> Result<EncodedTable> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.values().iter().map(|value| value.to_string()))?;
    }
    let utf8 = writer
        .into_inner()
        .map_err(|err| TableError::Io(err.into_error()))?;

    if encoding == UTF_8 {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(&utf8);
        return Ok(EncodedTable {
            bytes,
            lossy: false,
        });
    }

    let text = String::from_utf8_lossy(&utf8);
    let (encoded, _, lossy) = encoding.encode(&text);
    Ok(EncodedTable {
        bytes: encoded.into_owned(),
        lossy,
    })
}

/// Writes a raw table back in `format`. `encoding` only applies to
/// delimited output.
pub fn write_table(
    table: &RawTable,
    format: TableFormat,
    encoding: &'static Encoding,
) -> Result<EncodedTable> {
    match format {
        TableFormat::Delimited => write_table_csv(table, encoding),
        #[cfg(feature = "xlsx")]
        TableFormat::Workbook => Ok(EncodedTable {
            bytes: crate::workbook::write_workbook(table)?,
            lossy: false,
        }),
        #[cfg(not(feature = "xlsx"))]
        TableFormat::Workbook => Err(TableError::UnsupportedFormat(
            "workbook (built without the xlsx feature)".to_string(),
        )),
    }
}
