pub mod columns;
pub mod dedupe;
pub mod normalize;

pub use columns::{
    normalize_column_name, ColumnMap, ColumnOverrides, ColumnRole, ColumnRule, ColumnRules,
};
pub use dedupe::{dedupe_table, DedupOutcome, DedupeBy};
pub use normalize::{NormalizePolicy, PhoneNormalizer};
