use crate::domain::cell::CellValue;
use crate::domain::phone::{clean_digits, AreaCode, ValidatedPhone, AREA_CODE_LEN, SUBSCRIBER_LEN};
use crate::error::Rejection;

pub const COUNTRY_CODE: &str = "55";
pub const LANDLINE_PREFIX: char = '3';
pub const MOBILE_PREFIX: char = '9';

const LEGACY_SUBSCRIBER_LEN: usize = 8;
const MIN_LEN_WITH_AREA_CODE: usize = 10;

/// Validation switches that older revisions of the dialer export hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizePolicy {
    /// Reject subscriber numbers starting with `3` (landline and corporate ranges).
    pub reject_landline_prefix: bool,
    /// Drop a leading `55` from 12 and 13 digit numbers.
    pub strip_country_code: bool,
    /// Area code used when neither an area-code column nor the phone itself
    /// carries one. `None` rejects such records.
    pub fallback_area_code: Option<AreaCode>,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            reject_landline_prefix: true,
            strip_country_code: true,
            fallback_area_code: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhoneNormalizer {
    policy: NormalizePolicy,
}

impl PhoneNormalizer {
    pub fn new(policy: NormalizePolicy) -> Self {
        Self { policy }
    }

    pub fn normalize(
        &self,
        raw_phone: &CellValue,
        raw_area_code: Option<&CellValue>,
    ) -> Result<ValidatedPhone, Rejection> {
        let mut digits = clean_digits(raw_phone)?;
        if self.policy.strip_country_code {
            digits = strip_country_code(digits);
        }

        // An unusable area-code cell counts as absent.
        let external = raw_area_code.and_then(|value| clean_area_code(value).ok());

        let (area_code, candidate) = match external {
            Some(area) => (area.chars().take(AREA_CODE_LEN).collect::<String>(), digits),
            None if digits.len() >= MIN_LEN_WITH_AREA_CODE => {
                let subscriber = digits.split_off(AREA_CODE_LEN);
                (digits, subscriber)
            }
            None => match &self.policy.fallback_area_code {
                Some(fallback) => (fallback.as_str().to_string(), digits),
                None => return Err(Rejection::MissingAreaCode),
            },
        };

        let landline = candidate.starts_with(LANDLINE_PREFIX);
        let subscriber = if candidate.len() == LEGACY_SUBSCRIBER_LEN {
            format!("{MOBILE_PREFIX}{candidate}")
        } else {
            candidate
        };

        if subscriber.len() != SUBSCRIBER_LEN {
            return Err(Rejection::InvalidLength);
        }
        if self.policy.reject_landline_prefix && landline {
            return Err(Rejection::LandlinePrefix);
        }
        let area_code = AreaCode::new(&area_code).map_err(|_| Rejection::MissingAreaCode)?;

        Ok(ValidatedPhone::from_parts(area_code, subscriber))
    }
}

fn strip_country_code(digits: String) -> String {
    if matches!(digits.len(), 12 | 13) && digits.starts_with(COUNTRY_CODE) {
        return digits[COUNTRY_CODE.len()..].to_string();
    }
    digits
}

fn clean_area_code(value: &CellValue) -> Result<String, Rejection> {
    let mut digits = clean_digits(value)?;
    if digits.len() > AREA_CODE_LEN && digits.starts_with('0') {
        digits.remove(0);
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::{NormalizePolicy, PhoneNormalizer};
    use crate::domain::cell::CellValue;
    use crate::domain::phone::AreaCode;
    use crate::error::Rejection;

    fn normalize(phone: &str) -> Result<(String, String), Rejection> {
        PhoneNormalizer::default()
            .normalize(&CellValue::from(phone), None)
            .map(|phone| {
                (
                    phone.area_code().to_string(),
                    phone.subscriber_number().to_string(),
                )
            })
    }

    fn pair(area: &str, subscriber: &str) -> Result<(String, String), Rejection> {
        Ok((area.to_string(), subscriber.to_string()))
    }

    #[test]
    fn eleven_digit_mobile_splits_unchanged() {
        assert_eq!(normalize("11999998888"), pair("11", "999998888"));
        assert_eq!(normalize("(21) 98765-4321"), pair("21", "987654321"));
    }

    #[test]
    fn ten_digit_number_gets_mobile_nine() {
        assert_eq!(normalize("2199998888"), pair("21", "999998888"));
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let normalizer = PhoneNormalizer::default();
        let first = normalizer
            .normalize(&CellValue::from("1188887777"), None)
            .unwrap();
        let second = normalizer
            .normalize(&CellValue::from(first.digits()), None)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn float_artifact_and_country_code_are_repaired() {
        assert_eq!(normalize("55(11)98765-4321.0"), pair("11", "987654321"));
        let phone = PhoneNormalizer::default()
            .normalize(&CellValue::Float(5511987654321.0), None)
            .unwrap();
        assert_eq!(phone.subscriber_number(), "987654321");
    }

    #[test]
    fn country_code_kept_when_policy_disabled() {
        let normalizer = PhoneNormalizer::new(NormalizePolicy {
            strip_country_code: false,
            ..NormalizePolicy::default()
        });
        assert_eq!(
            normalizer.normalize(&CellValue::from("5511987654321"), None),
            Err(Rejection::InvalidLength)
        );
    }

    #[test]
    fn trunk_prefix_is_dropped() {
        assert_eq!(normalize("0 11 99999-8888"), pair("11", "999998888"));
    }

    #[test]
    fn empty_and_digitless_inputs_are_rejected() {
        assert_eq!(
            PhoneNormalizer::default().normalize(&CellValue::Empty, None),
            Err(Rejection::EmptyInput)
        );
        assert_eq!(normalize("abc"), Err(Rejection::NoDigits));
    }

    #[test]
    fn short_number_without_area_code_is_rejected() {
        assert_eq!(normalize("99998888"), Err(Rejection::MissingAreaCode));
    }

    #[test]
    fn fallback_area_code_applies_to_short_numbers() {
        let normalizer = PhoneNormalizer::new(NormalizePolicy {
            fallback_area_code: Some(AreaCode::new("31").unwrap()),
            ..NormalizePolicy::default()
        });
        let phone = normalizer
            .normalize(&CellValue::from("99998888"), None)
            .unwrap();
        assert_eq!(phone.area_code(), "31");
        assert_eq!(phone.subscriber_number(), "999998888");
    }

    #[test]
    fn external_area_code_takes_whole_phone_as_subscriber() {
        let normalizer = PhoneNormalizer::default();
        let phone = normalizer
            .normalize(&CellValue::from("99999-8888"), Some(&CellValue::from("(011)")))
            .unwrap();
        assert_eq!(phone.area_code(), "11");
        assert_eq!(phone.subscriber_number(), "999998888");

        let phone = normalizer
            .normalize(&CellValue::from("98887777"), Some(&CellValue::Float(47.0)))
            .unwrap();
        assert_eq!(phone.digits(), "47998887777");
    }

    #[test]
    fn blank_external_area_code_falls_back_to_phone_digits() {
        let phone = PhoneNormalizer::default()
            .normalize(&CellValue::from("11999998888"), Some(&CellValue::Empty))
            .unwrap();
        assert_eq!(phone.area_code(), "11");
    }

    #[test]
    fn one_digit_external_area_code_is_rejected() {
        assert_eq!(
            PhoneNormalizer::default()
                .normalize(&CellValue::from("999998888"), Some(&CellValue::from("1"))),
            Err(Rejection::MissingAreaCode)
        );
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert_eq!(normalize("119999988881"), Err(Rejection::InvalidLength));
        assert_eq!(normalize("1199999888"), pair("11", "999999888"));
        assert_eq!(normalize("11999999"), Err(Rejection::MissingAreaCode));
    }

    #[test]
    fn landline_prefix_rejected_by_default() {
        assert_eq!(normalize("11333334444"), Err(Rejection::LandlinePrefix));
        assert_eq!(normalize("1133334444"), Err(Rejection::LandlinePrefix));
    }

    #[test]
    fn landline_prefix_allowed_when_disabled() {
        let normalizer = PhoneNormalizer::new(NormalizePolicy {
            reject_landline_prefix: false,
            ..NormalizePolicy::default()
        });
        let phone = normalizer
            .normalize(&CellValue::from("11333334444"), None)
            .unwrap();
        assert_eq!(phone.subscriber_number(), "333334444");
    }
}
