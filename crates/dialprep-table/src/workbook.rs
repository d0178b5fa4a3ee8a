use crate::error::{Result, TableError};
use crate::format::TableFormat;
use crate::{ReadReport, ReadTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use dialprep_core::{CellValue, RawTable};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};
use std::io::Cursor;

/// Reads the first sheet; its first row is the header. Numeric cells keep
/// their type, so phone numbers typed as numbers arrive as floats.
pub fn read_workbook(bytes: Vec<u8>) -> Result<ReadTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::NoSheets)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(TableError::EmptyTable)?;
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(index, cell)| match cell_value(cell) {
            CellValue::Empty => format!("Unnamed: {index}"),
            value => value.to_string(),
        })
        .collect();

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    let table = RawTable::new(columns, rows);
    let report = ReadReport {
        format: TableFormat::Workbook,
        rows: table.len(),
        skipped_rows: 0,
        warnings: Vec::new(),
        encoding: None,
        delimiter: None,
    };
    Ok(ReadTable { table, report })
}

/// Writes `table` as a single-sheet `.xlsx`: header row first, numbers and
/// booleans keep their cell type.
pub fn write_workbook(table: &RawTable) -> Result<Vec<u8>> {
    let too_large = || TableError::SheetTooLarge {
        rows: table.len(),
        columns: table.column_names().len(),
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in table.column_names().iter().enumerate() {
        let col = ColNum::try_from(col).map_err(|_| too_large())?;
        sheet.write_string(0, col, name.as_str())?;
    }
    for (index, row) in table.rows().iter().enumerate() {
        let row_num = RowNum::try_from(index + 1).map_err(|_| too_large())?;
        for (col, value) in row.values().iter().enumerate() {
            let col = ColNum::try_from(col).map_err(|_| too_large())?;
            write_cell(sheet, row_num, col, value)?;
        }
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_cell(sheet: &mut Worksheet, row: RowNum, col: ColNum, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(text) => {
            sheet.write_string(row, col, text.as_str())?;
        }
        CellValue::Int(number) => {
            sheet.write_number(row, col, *number as f64)?;
        }
        CellValue::Float(number) if number.is_nan() => {}
        CellValue::Float(number) => {
            sheet.write_number(row, col, *number)?;
        }
        CellValue::Bool(flag) => {
            sheet.write_boolean(row, col, *flag)?;
        }
    }
    Ok(())
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(value) => CellValue::text(value.as_str()),
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        other => CellValue::text(other.to_string()),
    }
}
