//! # Numeric literals
//!
//! Validation of the number literals that may appear in a formula. Literals
//! follow the usual decimal notation:
//!
//! ```bnf
//! number ::= { [digit]+[.[digit]*] | [digit]*.[digit]+ }[{E | e} [{+ | -}] [digit]+]
//! ```
//!
//! Literals are always unsigned; a leading `-` or `+` in a formula is a unary
//! operator and never part of the constant.
//!
//! ```rust
//! use curve_shape::NumericConstant;
//! use std::str::FromStr;
//!
//! let whole = NumericConstant::from_str("14.").unwrap();
//! let fraction = NumericConstant::from_str(".375").unwrap();
//! let small = NumericConstant::from_str("8.123e-10").unwrap();
//!
//! assert_eq!(f64::from(whole), 14.0);
//! assert_eq!(f64::from(fraction), 0.375);
//! assert_eq!(f64::from(small), 8.123e-10);
//! ```

use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors that can occur while validating a numeric literal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericConstantError {
    /// The literal is empty or whitespace.
    #[error("Empty numeric constant")]
    EmptyNumericConstant,

    /// More than one decimal point, e.g. `1.2.3`.
    #[error("Multiple decimal points: '{0}'")]
    MultipleDecimalPoints(String),

    /// An exponent marker without a complete exponent, e.g. `1e` or `1e+`.
    #[error("Invalid scientific notation: '{0}'")]
    InvalidScientificNotation(String),

    /// A character that cannot appear in a literal.
    #[error("Unexpected character: '{1}' in '{0}'")]
    UnexpectedCharacter(String, char),

    /// No digits in the mantissa, e.g. `.`.
    #[error("No digits: '{0}'")]
    NoDigits(String),

    /// The literal overflows to infinity.
    #[error("Not a real number: '{0}' is not a valid real number")]
    NotARealNumber(String),
}

/// A validated, finite numeric literal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NumericConstant(pub f64);

/// Splits a literal into its mantissa and optional exponent part (marker included).
fn split_exponent(input: &str) -> (&str, Option<&str>) {
    match input.find(['E', 'e']) {
        Some(pos) => (&input[..pos], Some(&input[pos..])),
        None => (input, None),
    }
}

fn validate_mantissa(full: &str, mantissa: &str) -> Result<(), NumericConstantError> {
    if mantissa.is_empty() {
        return Err(NumericConstantError::InvalidScientificNotation(
            full.to_string(),
        ));
    }

    let mut has_digits = false;
    let mut has_decimal = false;
    for ch in mantissa.chars() {
        match ch {
            '0'..='9' => has_digits = true,
            '.' if has_decimal => {
                return Err(NumericConstantError::MultipleDecimalPoints(
                    full.to_string(),
                ));
            }
            '.' => has_decimal = true,
            c => {
                return Err(NumericConstantError::UnexpectedCharacter(
                    full.to_string(),
                    c,
                ));
            }
        }
    }

    if !has_digits {
        return Err(NumericConstantError::NoDigits(full.to_string()));
    }
    Ok(())
}

fn validate_exponent(full: &str, exponent: &str) -> Result<(), NumericConstantError> {
    // Skip the marker; a sign may follow it.
    let digits = exponent[1..]
        .strip_prefix(['+', '-'])
        .unwrap_or(&exponent[1..]);

    if digits.is_empty() {
        return Err(NumericConstantError::InvalidScientificNotation(
            full.to_string(),
        ));
    }
    match digits.chars().find(|c| !c.is_ascii_digit()) {
        Some(c) => Err(NumericConstantError::UnexpectedCharacter(
            full.to_string(),
            c,
        )),
        None => Ok(()),
    }
}

impl FromStr for NumericConstant {
    type Err = NumericConstantError;

    /// Validates the literal structure, then parses the whole literal in one
    /// step so no precision is lost applying the exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(NumericConstantError::EmptyNumericConstant);
        }

        let (mantissa, exponent) = split_exponent(input);
        validate_mantissa(input, mantissa)?;
        if let Some(exponent) = exponent {
            validate_exponent(input, exponent)?;
        }

        // Rust's float grammar accepts everything validated above, including
        // the `5.` and `.5` forms.
        match input.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(NumericConstant(value)),
            _ => Err(NumericConstantError::NotARealNumber(input.to_string())),
        }
    }
}

impl From<f64> for NumericConstant {
    fn from(value: f64) -> Self {
        NumericConstant(value)
    }
}

impl From<NumericConstant> for f64 {
    fn from(value: NumericConstant) -> Self {
        value.0
    }
}

impl fmt::Display for NumericConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
