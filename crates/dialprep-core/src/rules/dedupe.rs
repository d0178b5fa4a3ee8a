use crate::domain::table::RawTable;
use crate::error::CoreError;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DedupeBy {
    None,
    #[default]
    SubscriberNumber,
    /// Column name; cells compare by their rendered text.
    ReferenceColumn(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    pub table: RawTable,
    pub total_before: usize,
    pub total_after: usize,
    pub removed: usize,
}

/// Keeps the first row for each distinct value of `column`. No phone logic.
pub fn dedupe_table(table: &RawTable, column: &str) -> Result<DedupOutcome, CoreError> {
    let index = table
        .column_index(column)
        .ok_or_else(|| CoreError::UnknownColumn(column.to_string()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|row| seen.insert(row.get(index).to_string()))
        .cloned()
        .collect();

    let total_before = table.len();
    let total_after = rows.len();
    Ok(DedupOutcome {
        table: table.with_rows(rows),
        total_before,
        total_after,
        removed: total_before - total_after,
    })
}
