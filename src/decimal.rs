//! Fixed-point decimal numbers with the range RFC 9651 allows.
//!
//! Structured-field decimals carry at most twelve integer digits and one to
//! three fraction digits. [`Decimal`] stores them exactly as a scaled
//! integer, `mantissa * 10^exponent` with the exponent in `{0, -1, -2, -3}`,
//! instead of a binary float or a general-purpose decimal type. The wire
//! range is narrow enough that an `(i64, i8)` pair with a validation
//! predicate covers it completely.
//!
//! ## Examples
//!
//! ```rust
//! use structured_fields::Decimal;
//!
//! let d = Decimal::new(987_654_321_123, -3).unwrap();
//! assert_eq!(d.to_string(), "987654321.123");
//!
//! // Equality is by value, not by representation.
//! assert_eq!(Decimal::new(150, -2).unwrap(), Decimal::new(15, -1).unwrap());
//!
//! // Out-of-range construction is rejected.
//! assert!(Decimal::new(1_000_000_000_000_000, -3).is_err());
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// Largest magnitude a structured-field integer, date, or decimal mantissa
/// may take: fifteen nines.
pub(crate) const MAX_NUMERIC: i64 = 999_999_999_999_999;

/// A fixed-point decimal: `mantissa * 10^exponent`, exponent in
/// `{0, -1, -2, -3}`.
///
/// The mantissa magnitude is bounded by `10^(12 + |exponent|) - 1`, so the
/// integer part never exceeds twelve digits regardless of scale. Every
/// constructor and mutator validates before committing; a `Decimal` value
/// is always serializable.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i64,
    exponent: i8,
}

fn mantissa_limit(exponent: i8) -> Option<u64> {
    match exponent {
        0 => Some(999_999_999_999),
        -1 => Some(9_999_999_999_999),
        -2 => Some(99_999_999_999_999),
        -3 => Some(MAX_NUMERIC as u64),
        _ => None,
    }
}

impl Decimal {
    /// Creates a decimal from a mantissa and exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIntegerOrDecimal`] if the exponent is outside
    /// `{0, -1, -2, -3}` or the mantissa magnitude exceeds
    /// `10^(12 + |exponent|) - 1`.
    pub fn new(mantissa: i64, exponent: i8) -> Result<Self> {
        match mantissa_limit(exponent) {
            Some(limit) if mantissa.unsigned_abs() <= limit => {
                Ok(Decimal { mantissa, exponent })
            }
            _ => Err(Error::InvalidIntegerOrDecimal),
        }
    }

    /// The stored mantissa.
    #[must_use]
    pub fn mantissa(&self) -> i64 {
        self.mantissa
    }

    /// The stored exponent, in `{0, -1, -2, -3}`.
    #[must_use]
    pub fn exponent(&self) -> i8 {
        self.exponent
    }

    /// Replaces the mantissa, validating against the current exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIntegerOrDecimal`] without modifying `self`
    /// if the new mantissa is out of range.
    pub fn set_mantissa(&mut self, mantissa: i64) -> Result<()> {
        *self = Decimal::new(mantissa, self.exponent)?;
        Ok(())
    }

    /// Replaces the exponent, validating against the current mantissa.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIntegerOrDecimal`] without modifying `self`
    /// if the mantissa does not fit at the new scale.
    pub fn set_exponent(&mut self, exponent: i8) -> Result<()> {
        *self = Decimal::new(self.mantissa, exponent)?;
        Ok(())
    }

    /// Returns the canonical representation of this value.
    ///
    /// Canonical decimals have an exponent of at most `-1` and no trailing
    /// zero digits after the decimal point beyond the first fraction digit:
    /// `(150, -2)` becomes `(15, -1)` and `(5, 0)` becomes `(50, -1)`. The
    /// serializer renders this form.
    #[must_use]
    pub fn canonicalize(self) -> Self {
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;

        if exponent == 0 {
            // Twelve integer digits times ten still fits at exponent -1.
            mantissa *= 10;
            exponent = -1;
        }
        while exponent < -1 && mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }

        Decimal { mantissa, exponent }
    }

    /// The closest `f64` to this value.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(-i32::from(self.exponent))
    }
}

/// Converts a float by scaling to thousandths with banker's rounding, the
/// rounding RFC 9651 prescribes for decimal serialization.
impl TryFrom<f64> for Decimal {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        let scaled = (value * 1000.0).round_ties_even();
        if !scaled.is_finite() || scaled.abs() > MAX_NUMERIC as f64 {
            return Err(Error::InvalidIntegerOrDecimal);
        }
        Decimal::new(scaled as i64, -3)
    }
}

/// Value equality: `1.50` and `1.5` compare equal even though their stored
/// representations differ.
impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.canonicalize();
        let b = other.canonicalize();
        a.mantissa == b.mantissa && a.exponent == b.exponent
    }
}

impl Eq for Decimal {}

/// Renders the canonical wire form: `[-]digits.fraction` with one to three
/// fraction digits and a leading zero when the value is below one.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let canonical = self.canonicalize();
        let digits = (-canonical.exponent) as u32;
        let scale = 10u64.pow(digits);
        let abs = canonical.mantissa.unsigned_abs();

        if canonical.mantissa < 0 {
            f.write_str("-")?;
        }
        write!(
            f,
            "{}.{:0width$}",
            abs / scale,
            abs % scale,
            width = digits as usize
        )
    }
}
