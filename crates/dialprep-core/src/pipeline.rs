use crate::domain::cell::CellValue;
use crate::domain::table::RawTable;
use crate::error::{CoreError, Rejection};
use crate::output::{OutputField, OutputRecord, OutputRecordBuilder, DIAL_NOW};
use crate::rules::columns::ColumnMap;
use crate::rules::dedupe::DedupeBy;
use crate::rules::normalize::{NormalizePolicy, PhoneNormalizer};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_FIRST_ID: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub normalize: NormalizePolicy,
    pub dedupe: DedupeBy,
    pub first_id: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizePolicy::default(),
            dedupe: DedupeBy::default(),
            first_id: DEFAULT_FIRST_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchStats {
    pub total_in: usize,
    pub total_out: usize,
    pub rejected: usize,
    pub duplicates_removed: usize,
    pub rejections: BTreeMap<Rejection, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub records: Vec<OutputRecord>,
    pub stats: BatchStats,
}

impl Batch {
    pub fn preview(&self, rows: usize) -> &[OutputRecord] {
        &self.records[..rows.min(self.records.len())]
    }
}

/// Turns a raw contact table into dialer rows.
///
/// Rows are visited in input order. Rejected rows and duplicates are
/// dropped and only counted, so `total_in == total_out + rejected +
/// duplicates_removed`. Surviving rows get sequential ids from
/// `options.first_id`; running past `u64::MAX` is `IdOverflow`.
pub fn process(
    table: &RawTable,
    columns: &ColumnMap,
    options: &PipelineOptions,
) -> Result<Batch, CoreError> {
    let phone_index = column_index(table, columns.require_phone()?)?;
    let area_code_index = columns
        .area_code_column
        .as_deref()
        .map(|name| column_index(table, name))
        .transpose()?;
    let name_index = columns
        .name_column
        .as_deref()
        .map(|name| column_index(table, name))
        .transpose()?;
    let reference_index = match &options.dedupe {
        DedupeBy::ReferenceColumn(name) => Some(column_index(table, name)?),
        DedupeBy::None | DedupeBy::SubscriberNumber => None,
    };
    let carried: Vec<(OutputField, usize)> = OutputField::ALL
        .into_iter()
        .filter(|field| field.carries_input())
        .filter_map(|field| table.column_index(field.name()).map(|index| (field, index)))
        .collect();

    let normalizer = PhoneNormalizer::new(options.normalize.clone());
    let mut stats = BatchStats {
        total_in: table.len(),
        ..BatchStats::default()
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    let mut next_id = Some(options.first_id);

    for row in table.rows() {
        let area_code = area_code_index.map(|index| row.get(index));
        let phone = match normalizer.normalize(row.get(phone_index), area_code) {
            Ok(phone) => phone,
            Err(reason) => {
                stats.rejected += 1;
                *stats.rejections.entry(reason).or_default() += 1;
                continue;
            }
        };

        let dedupe_key = match (&options.dedupe, reference_index) {
            // Same subscriber under another area code is a different line.
            (DedupeBy::SubscriberNumber, _) => Some(phone.digits()),
            (DedupeBy::ReferenceColumn(_), Some(index)) => Some(row.get(index).to_string()),
            _ => None,
        };
        if let Some(key) = dedupe_key {
            if !seen.insert(key) {
                stats.duplicates_removed += 1;
                continue;
            }
        }

        let id = next_id.ok_or(CoreError::IdOverflow(u64::MAX))?;
        next_id = id.checked_add(1);
        let id = id.to_string();

        let mut builder = OutputRecordBuilder::new();
        builder
            .set(OutputField::Id, id.clone())
            .set(OutputField::ClientId, id)
            .set(
                OutputField::FirstName,
                name_index
                    .map(|index| first_name(row.get(index)))
                    .unwrap_or_default(),
            )
            .set(OutputField::AreaCode1, phone.area_code())
            .set(OutputField::Phone1, phone.subscriber_number())
            .set(OutputField::ScheduledAt, "")
            .set(OutputField::DialNow, DIAL_NOW);
        for (field, index) in &carried {
            builder.set(*field, row.get(*index).to_string());
        }
        records.push(builder.build());
    }

    stats.total_out = records.len();
    Ok(Batch { records, stats })
}

/// First whitespace-separated token of the trimmed cell text.
pub fn first_name(value: &CellValue) -> String {
    value
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn column_index(table: &RawTable, name: &str) -> Result<usize, CoreError> {
    table
        .column_index(name)
        .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))
}
