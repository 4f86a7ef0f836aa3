//! Discount Percentages
//!
//! Percentages are fractions (`0.25` is 25% off). Anything outside `0..=1` is
//! rejected when a rule is built, so a rule can never price a line below zero
//! or above its original total.

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while parsing or validating a percentage.
#[derive(Debug, Error, PartialEq)]
pub enum PercentageError {
    /// The value could not be parsed.
    #[error("invalid percentage value: '{0}'")]
    Invalid(String),

    /// The value is below 0% or above 100%.
    #[error("percentage {0} is outside 0% to 100%")]
    OutOfRange(Decimal),
}

/// Parse a percentage from `"0.25"` or `"25%"`.
///
/// # Errors
///
/// - [`PercentageError::Invalid`]: the string is not a number.
/// - [`PercentageError::OutOfRange`]: the value is outside `0..=1` after normalising.
pub fn parse_percentage(value: &str) -> Result<Percentage, PercentageError> {
    let trimmed = value.trim();

    let (number, has_percent_suffix) = match trimmed.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), true),
        None => (trimmed, false),
    };

    let mut fraction =
        Decimal::from_str(number).map_err(|_err| PercentageError::Invalid(value.to_string()))?;

    if has_percent_suffix {
        fraction /= Decimal::ONE_HUNDRED;
    }

    from_fraction(fraction)
}

/// Build a percentage from a fraction between 0 and 1.
///
/// # Errors
///
/// Returns [`PercentageError::OutOfRange`] if `fraction` is outside `0..=1`.
pub fn from_fraction(fraction: Decimal) -> Result<Percentage, PercentageError> {
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(PercentageError::OutOfRange(fraction));
    }

    Ok(Percentage::from(fraction))
}

/// Build a percentage from whole percent points (`20` is 20% off).
///
/// # Errors
///
/// Returns [`PercentageError::OutOfRange`] if `points` is above 100.
pub fn from_points(points: u32) -> Result<Percentage, PercentageError> {
    from_fraction(Decimal::from(points) / Decimal::ONE_HUNDRED)
}

/// Check an existing percentage is within `0..=1`.
///
/// # Errors
///
/// Returns [`PercentageError::OutOfRange`] if it is not.
pub fn validate(percentage: Percentage) -> Result<Percentage, PercentageError> {
    from_fraction(fraction(percentage))
}

/// The fractional value of a percentage (`0.25` for 25%).
pub fn fraction(percentage: Percentage) -> Decimal {
    percentage * Decimal::ONE
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_fractions_and_percent_suffixes() -> TestResult {
        assert_eq!(fraction(parse_percentage("0.25")?), Decimal::new(25, 2));
        assert_eq!(fraction(parse_percentage("25%")?), Decimal::new(25, 2));
        assert_eq!(fraction(parse_percentage(" 5 % ")?), Decimal::new(5, 2));

        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_percentage("a lot").err(),
            Some(PercentageError::Invalid("a lot".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            parse_percentage("150%"),
            Err(PercentageError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_percentage("-0.1"),
            Err(PercentageError::OutOfRange(_))
        ));
        assert!(matches!(from_points(101), Err(PercentageError::OutOfRange(_))));
    }

    #[test]
    fn boundaries_are_inclusive() -> TestResult {
        assert_eq!(fraction(from_points(0)?), Decimal::ZERO);
        assert_eq!(fraction(from_points(100)?), Decimal::ONE);

        Ok(())
    }

    #[test]
    fn validate_catches_unchecked_percentages() {
        let too_big = Percentage::from(Decimal::TWO);

        assert!(matches!(
            validate(too_big),
            Err(PercentageError::OutOfRange(_))
        ));
    }
}
