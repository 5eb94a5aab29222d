use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul, Sub};

/// Money type for currency amounts, 8 decimal places internally
///
/// Serialized as a JSON number; string amounts are still accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// const constructor, stored as given
    pub const fn from_decimal_const(d: Decimal) -> Self {
        Money(d)
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// lossy float view for closed-form formulas
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// round to whole units, half away from zero
    pub fn round_whole(&self) -> Self {
        Money(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// apply a fractional rate (e.g., 0.2 of $15,000)
    pub fn portion(&self, rate: Rate) -> Self {
        Money((self.0 * rate.as_decimal()).round_dp(8))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(8))
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(8))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money((self.0 / other).round_dp(8))
    }
}

/// fraction of a whole: interest rates and down-payment shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// lossy float view for closed-form formulas
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// whole percentage points, half away from zero
    pub fn whole_percentage(&self) -> u32 {
        (self.0 * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// complement (1 - rate)
    pub fn complement(&self) -> Rate {
        Rate(Decimal::ONE - self.0)
    }

    /// restrict to [min, max]
    pub fn clamp(self, min: Rate, max: Rate) -> Rate {
        Rate(self.0.max(min.0).min(max.0))
    }
}
