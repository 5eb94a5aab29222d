use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{PrequalError, Result};

pub const MIN_DOWN_PAYMENT_PCT: Decimal = dec!(0.20);
pub const MAX_DOWN_PAYMENT_PCT: Decimal = dec!(0.50);
pub const MIN_TERM_MONTHS: u32 = 12;
pub const MAX_TERM_MONTHS: u32 = 72;

/// slider bounds and steps for the loan step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanLimits {
    pub min_vehicle_amount: Money,
    pub max_vehicle_amount: Money,
    pub vehicle_amount_step: Money,
    pub min_down_payment_pct: u32,
    pub max_down_payment_pct: u32,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub term_step: u32,
}

impl Default for LoanLimits {
    fn default() -> Self {
        Self {
            min_vehicle_amount: Money::from_major(8_000),
            max_vehicle_amount: Money::from_major(60_000),
            vehicle_amount_step: Money::from_major(100),
            min_down_payment_pct: 20,
            max_down_payment_pct: 50,
            min_term_months: MIN_TERM_MONTHS,
            max_term_months: MAX_TERM_MONTHS,
            term_step: 3,
        }
    }
}

impl LoanLimits {
    /// snap to the nearest step, then clamp
    pub fn normalize_amount(&self, raw: Decimal) -> Money {
        let step = self.vehicle_amount_step.as_decimal();
        let snapped = if step.is_zero() {
            raw
        } else {
            (raw / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
        };
        Money::from_decimal(snapped)
            .max(self.min_vehicle_amount)
            .min(self.max_vehicle_amount)
    }

    /// whole percentage points, clamped
    pub fn normalize_down_payment(&self, raw_percent: Decimal) -> Rate {
        let whole = raw_percent
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
            .clamp(self.min_down_payment_pct as i64, self.max_down_payment_pct as i64);
        Rate::from_percentage(whole as u32)
    }

    pub fn normalize_term(&self, raw: u32) -> u32 {
        let step = self.term_step.max(1);
        let snapped = (raw + step / 2) / step * step;
        snapped.clamp(self.min_term_months, self.max_term_months)
    }
}

/// loan parameters chosen on the second step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub vehicle_amount: Money,
    /// fraction of the vehicle price, e.g. 0.2
    pub down_payment_pct: Rate,
    pub term_months: u32,
}

impl Default for LoanRequest {
    fn default() -> Self {
        Self {
            vehicle_amount: Money::from_major(15_000),
            down_payment_pct: Rate::from_decimal(MIN_DOWN_PAYMENT_PCT),
            term_months: 48,
        }
    }
}

impl LoanRequest {
    pub fn new(vehicle_amount: Money, down_payment_pct: Rate, term_months: u32) -> Self {
        Self {
            vehicle_amount,
            down_payment_pct,
            term_months,
        }
    }

    /// build from raw slider values (amount, percent 0-100, months)
    pub fn from_inputs(limits: &LoanLimits, amount: Decimal, down_payment_percent: Decimal, term_months: u32) -> Self {
        Self {
            vehicle_amount: limits.normalize_amount(amount),
            down_payment_pct: limits.normalize_down_payment(down_payment_percent),
            term_months: limits.normalize_term(term_months),
        }
    }

    /// down payment and term restricted to their allowed ranges
    pub fn clamped(&self) -> Self {
        Self {
            vehicle_amount: self.vehicle_amount,
            down_payment_pct: self.down_payment_pct.clamp(
                Rate::from_decimal(MIN_DOWN_PAYMENT_PCT),
                Rate::from_decimal(MAX_DOWN_PAYMENT_PCT),
            ),
            term_months: self.term_months.clamp(MIN_TERM_MONTHS, MAX_TERM_MONTHS),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.vehicle_amount.is_positive() {
            return Err(PrequalError::InvalidVehicleAmount {
                amount: self.vehicle_amount,
            });
        }
        Ok(())
    }

    /// down payment rounded to whole currency units
    pub fn down_payment_amount(&self) -> Money {
        self.vehicle_amount.portion(self.down_payment_pct).round_whole()
    }

    /// price minus the rounded down payment
    pub fn financed_amount(&self) -> Money {
        self.vehicle_amount - self.down_payment_amount()
    }

    /// unrounded price x (1 - down payment pct)
    pub fn financed_share(&self) -> Money {
        self.vehicle_amount.portion(self.down_payment_pct.complement())
    }
}
