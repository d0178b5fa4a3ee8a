use crate::domain::cell::CellValue;
use crate::rules::columns::normalize_column_name;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One input row, aligned with the owning table's column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    values: Vec<CellValue>,
}

impl RawRecord {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// Out-of-range indexes read as an empty cell.
    pub fn get(&self, index: usize) -> &CellValue {
        self.values.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRecord>,
}

impl RawTable {
    /// Rows shorter than the header are padded with empty cells, longer ones truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, CellValue::Empty);
                RawRecord::new(values)
            })
            .collect();
        Self { columns, rows }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact name first, then the case/whitespace-insensitive form.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.columns.iter().position(|column| column == name) {
            return Some(index);
        }
        let wanted = normalize_column_name(name);
        self.columns
            .iter()
            .position(|column| normalize_column_name(column) == wanted)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|record| record.get(index))
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<RawRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
