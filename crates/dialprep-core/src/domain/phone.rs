use crate::domain::cell::CellValue;
use crate::error::{CoreError, Rejection};
use serde::Serialize;

pub const AREA_CODE_LEN: usize = 2;
pub const SUBSCRIBER_LEN: usize = 9;

const TRUNK_PREFIX: char = '0';
const TRUNK_MIN_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AreaCode(String);

impl AreaCode {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.len() != AREA_CODE_LEN || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(CoreError::InvalidAreaCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A phone number that passed every validation rule: 2-digit area code
/// plus 9-digit subscriber number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidatedPhone {
    area_code: AreaCode,
    subscriber_number: String,
}

impl ValidatedPhone {
    pub(crate) fn from_parts(area_code: AreaCode, subscriber_number: String) -> Self {
        debug_assert_eq!(subscriber_number.len(), SUBSCRIBER_LEN);
        Self {
            area_code,
            subscriber_number,
        }
    }

    pub fn area_code(&self) -> &str {
        self.area_code.as_str()
    }

    pub fn subscriber_number(&self) -> &str {
        &self.subscriber_number
    }

    /// Area code followed by subscriber number, the form `normalize` accepts back.
    pub fn digits(&self) -> String {
        format!("{}{}", self.area_code.as_str(), self.subscriber_number)
    }
}

/// Reduces a raw cell to its digits.
///
/// Integral floats and float-stringified text (`"11999998888.0"`) lose their
/// `.0` before digits are collected, so the fraction never leaks in as a
/// trailing zero. A leading trunk `0` is dropped from long numbers.
pub fn clean_digits(value: &CellValue) -> Result<String, Rejection> {
    if value.is_empty() {
        return Err(Rejection::EmptyInput);
    }

    let rendered = value.to_string();
    let source = strip_float_suffix(rendered.trim());
    let mut digits: String = source.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(Rejection::NoDigits);
    }

    if digits.len() >= TRUNK_MIN_LEN && digits.starts_with(TRUNK_PREFIX) {
        digits.remove(0);
    }

    Ok(digits)
}

fn strip_float_suffix(value: &str) -> &str {
    match value.strip_suffix(".0") {
        Some(rest) if rest.ends_with(|ch: char| ch.is_ascii_digit()) => rest,
        _ => value,
    }
}
