//! Money type
//!
//! Domain primitive for monetary values. Amounts are stored as integer cents
//! so ledger arithmetic is exact; conversion to and from `Decimal` happens only
//! at the boundary (parsing requests, loading snapshots, serializing reports).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency precision (2 decimal places)
pub const CURRENCY_SCALE: u32 = 2;

/// Largest absolute value accepted at the boundary (1 trillion units)
const MAX_UNITS: i64 = 1_000_000_000_000;

/// Money is a signed, fixed-point monetary value in minor units (cents).
///
/// Unlike a raw float, sums of `Money` never drift: the closed-ledger
/// invariant holds with exact equality.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use split_ledger::domain::Money;
///
/// let price: Money = "90.00".parse().unwrap();
/// assert_eq!(price.cents(), 9000);
/// assert_eq!(price.to_decimal(), Decimal::new(9000, 2));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

/// Errors that can occur when converting a boundary value into Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Amount has too many decimal places (max {CURRENCY_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount out of range (max {MAX_UNITS} units)")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest representable amount
    pub const MAX: Money = Money(i64::MAX);

    /// Create Money from a count of minor units.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert an exact decimal value.
    ///
    /// # Errors
    /// - `MoneyError::TooManyDecimals` if the value has sub-cent precision
    /// - `MoneyError::Overflow` if the magnitude exceeds 1 trillion units
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let normalized = value.normalize();
        if normalized.scale() > CURRENCY_SCALE {
            return Err(MoneyError::TooManyDecimals(normalized.scale()));
        }
        Self::from_decimal_rounded(normalized)
    }

    /// Convert a decimal value, rounding half away from zero to whole cents.
    pub fn from_decimal_rounded(value: Decimal) -> Result<Self, MoneyError> {
        if value.abs() > Decimal::from(MAX_UNITS) {
            return Err(MoneyError::Overflow);
        }

        let rounded =
            value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let cents = (rounded * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or(MoneyError::Overflow)?;

        Ok(Self(cents))
    }

    /// Minor units (cents).
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Decimal view with exactly two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, CURRENCY_SCALE)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Add two amounts without wrapping.
    ///
    /// # Errors
    /// `MoneyError::Overflow` if the sum is not representable
    pub fn try_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Subtract `other` without wrapping.
    ///
    /// # Errors
    /// `MoneyError::Overflow` if the difference is not representable
    pub fn try_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Sum a sequence of amounts, failing on the first overflow.
    pub fn try_sum<I>(amounts: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts.into_iter().try_fold(Money::ZERO, Money::try_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| MoneyError::ParseError(e.to_string()))?;
        Money::from_decimal(decimal)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::from_str(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}
