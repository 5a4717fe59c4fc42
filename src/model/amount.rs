//! Amount type for whole-unit monetary values.
//!
//! Amounts are parsed the way an integer parser reads user input: surrounding whitespace is
//! ignored and a fractional part is truncated rather than rounded. Negative, empty and
//! non-numeric inputs are rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a non-negative, whole-unit amount of money.
///
/// The value is bounded by `i64::MAX` so that it can always take part in signed balance
/// arithmetic.
///
/// # Examples
///
/// ```
/// # use budget_book::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str(" 1200 ").unwrap();
/// assert_eq!(amount.value(), 1200);
/// ```
///
/// Fractional input is truncated:
/// ```
/// # use budget_book::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12.9").unwrap();
/// assert_eq!(amount.value(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// The largest representable amount.
    pub const MAX: Amount = Amount(i64::MAX as u64);

    /// Creates an `Amount`, returning `None` if `value` exceeds `Amount::MAX`.
    pub fn new(value: u64) -> Option<Self> {
        if value > Self::MAX.0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the underlying value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the value as a signed quantity for balance arithmetic.
    pub fn signed(&self) -> i64 {
        // Construction guarantees the value fits.
        self.0 as i64
    }

    /// Creates an `Amount` from a JSON-style number, truncating any fraction.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::Invalid(value.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative(value.to_string()));
        }
        // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
        let truncated = value.trunc();
        if truncated >= i64::MAX as f64 {
            return Err(AmountError::TooLarge(value.to_string()));
        }
        Amount::new(truncated as u64).ok_or_else(|| AmountError::TooLarge(value.to_string()))
    }
}

/// An error that can occur when parsing an `Amount`.
#[derive(Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    Negative(String),
    Invalid(String),
    TooLarge(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "the amount is empty"),
            AmountError::Negative(s) => write!(f, "the amount '{s}' is negative"),
            AmountError::Invalid(s) => write!(f, "the amount '{s}' is not a whole number"),
            AmountError::TooLarge(s) => write!(f, "the amount '{s}' is too large"),
        }
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        // Keep the whole part of "123.45"; the fraction must still be digits.
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        let whole = whole.strip_prefix('+').unwrap_or(whole);
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::Invalid(trimmed.to_string()));
        }

        let value = whole
            .parse::<u64>()
            .map_err(|_| AmountError::TooLarge(trimmed.to_string()))?;
        Amount::new(value).ok_or_else(|| AmountError::TooLarge(trimmed.to_string()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The storage boundary expects an integer.
        serializer.serialize_u64(self.0)
    }
}

/// An amount as it arrives from storage: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

// JSON has no NaN, so a stored float always equals itself.
impl Eq for RawAmount {}

impl RawAmount {
    /// Parses the raw value into an `Amount`.
    pub fn to_amount(&self) -> Result<Amount, AmountError> {
        match self {
            RawAmount::Unsigned(n) => {
                Amount::new(*n).ok_or_else(|| AmountError::TooLarge(n.to_string()))
            }
            RawAmount::Float(n) => Amount::from_f64(*n),
            RawAmount::Text(s) => Amount::from_str(s),
        }
    }
}

impl From<Amount> for RawAmount {
    fn from(amount: Amount) -> Self {
        RawAmount::Unsigned(amount.value())
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts either a JSON number or a numeric string.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawAmount::deserialize(deserializer)?
            .to_amount()
            .map_err(serde::de::Error::custom)
    }
}
