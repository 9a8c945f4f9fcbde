//! Fixed-point normalization of user-entered numbers.
//!
//! The ledger stores NUMBER and LOCATION values as integers scaled by
//! [`FLOAT_PRECISION`]. Conversion runs in exact decimal arithmetic and
//! truncates toward zero, so `"0.0000019"` becomes `1` and `"-1.5"` becomes
//! `-1_500_000`.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::FormError;
use crate::limits::FLOAT_PRECISION;

/// Parses a decimal string, accepting plain (`12.5`) and scientific (`1.25e1`)
/// notation. Surrounding whitespace is ignored; digit separators (`1_000`)
/// are not accepted.
pub fn parse_decimal(field: &'static str, input: &str) -> Result<Decimal, FormError> {
    let invalid = || FormError::InvalidNumber {
        field,
        input: input.to_string(),
    };
    let trimmed = input.trim();
    if trimmed.contains('_') {
        return Err(invalid());
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())
}

/// Returns whether an optional numeric input counts as present.
///
/// Blank input and any spelling of zero are absent. Text that does not parse
/// counts as present so that encoding reports it instead of dropping it.
pub fn is_truthy(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    match parse_decimal("value", trimmed) {
        Ok(d) => !d.is_zero(),
        Err(_) => true,
    }
}

/// Scales a decimal to the ledger's fixed-point integer form.
pub fn to_fixed_point(field: &'static str, value: Decimal, input: &str) -> Result<i64, FormError> {
    value
        .checked_mul(Decimal::from(FLOAT_PRECISION))
        .map(|scaled| scaled.trunc())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| FormError::NumberOutOfRange {
            field,
            input: input.to_string(),
        })
}

/// Parses and normalizes a decimal input.
pub fn normalize_int(field: &'static str, input: &str) -> Result<i64, FormError> {
    let value = parse_decimal(field, input)?;
    to_fixed_point(field, value, input)
}

/// Parses a percentage, converts it to a fraction and normalizes it.
///
/// `"50"` is 0.5, which normalizes to `500_000`.
pub fn normalize_percentage(field: &'static str, input: &str) -> Result<i64, FormError> {
    let value = parse_decimal(field, input)? / Decimal::ONE_HUNDRED;
    to_fixed_point(field, value, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_int() {
        assert_eq!(normalize_int("weight", "10"), Ok(10_000_000));
        assert_eq!(normalize_int("latitude", "1.5"), Ok(1_500_000));
        assert_eq!(normalize_int("latitude", " -2.25 "), Ok(-2_250_000));
        assert_eq!(normalize_int("weight", "1e2"), Ok(100_000_000));
    }

    #[test]
    fn test_normalize_truncates_toward_zero() {
        assert_eq!(normalize_int("weight", "0.0000019"), Ok(1));
        assert_eq!(normalize_int("weight", "-0.0000019"), Ok(-1));
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_percentage("assay", "50"), Ok(500_000));
        assert_eq!(normalize_percentage("assay", "12.5"), Ok(125_000));
        assert_eq!(normalize_percentage("assay", "100"), Ok(1_000_000));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(
            normalize_int("weight", "ten"),
            Err(FormError::InvalidNumber {
                field: "weight",
                input: "ten".to_string()
            })
        );
        assert_eq!(
            normalize_int("weight", "1_0"),
            Err(FormError::InvalidNumber {
                field: "weight",
                input: "1_0".to_string()
            })
        );
        assert!(normalize_percentage("assay", "5_0").is_err());
        assert!(matches!(
            normalize_int("weight", "99999999999999999999"),
            Err(FormError::NumberOutOfRange { field: "weight", .. })
        ));
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("   "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("0.000"));
        assert!(!is_truthy("-0"));
        assert!(is_truthy("0.1"));
        assert!(is_truthy("-3"));
        assert!(is_truthy("abc"));
    }

    proptest! {
        #[test]
        fn prop_integers_scale_exactly(n in -1_000_000i64..1_000_000) {
            prop_assert_eq!(normalize_int("weight", &n.to_string()), Ok(n * FLOAT_PRECISION));
        }

        #[test]
        fn prop_normalize_is_deterministic(s in "-?[0-9]{1,6}(\\.[0-9]{1,8})?") {
            prop_assert_eq!(normalize_int("weight", &s), normalize_int("weight", &s));
        }
    }
}
