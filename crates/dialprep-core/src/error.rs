use crate::rules::columns::ColumnRole;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no {0} column found")]
    MissingRequiredColumn(ColumnRole),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("column bound to more than one role: {0}")]
    ColumnBoundTwice(String),
    #[error("invalid area code: {0}")]
    InvalidAreaCode(String),
    #[error("empty keyword list for {0} column")]
    EmptyKeywords(ColumnRole),
    #[error("record id overflows after {0}")]
    IdOverflow(u64),
}

/// Why a single record was dropped. Recoverable: the batch keeps going.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("empty phone value")]
    EmptyInput,
    #[error("phone value has no digits")]
    NoDigits,
    #[error("no area code available")]
    MissingAreaCode,
    #[error("subscriber number is not 9 digits")]
    InvalidLength,
    #[error("landline subscriber prefix")]
    LandlinePrefix,
}

impl Rejection {
    pub const ALL: [Rejection; 5] = [
        Rejection::EmptyInput,
        Rejection::NoDigits,
        Rejection::MissingAreaCode,
        Rejection::InvalidLength,
        Rejection::LandlinePrefix,
    ];
}
