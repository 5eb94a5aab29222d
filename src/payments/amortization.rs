use rust_decimal::Decimal;

use crate::config::DEFAULT_ANNUAL_RATE;
use crate::decimal::{Money, Rate};

/// monthly compounding periods per year
const PERIODS_PER_YEAR: f64 = 12.0;

/// 30/360 day-count fraction of one monthly period
const YEAR_FRACTION: f64 = 30.0 / 360.0;

/// French (annuity) amortization at a fixed nominal annual rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationCalculator {
    annual_rate: Rate,
}

impl Default for AmortizationCalculator {
    fn default() -> Self {
        Self::new(Rate::from_decimal(DEFAULT_ANNUAL_RATE))
    }
}

impl AmortizationCalculator {
    pub fn new(annual_rate: Rate) -> Self {
        Self { annual_rate }
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    /// effective annual rate of the nominal rate compounded monthly
    pub fn effective_annual_rate(&self) -> f64 {
        effective_annual_rate(self.annual_rate.to_f64())
    }

    /// monthly rate derived from the effective annual rate
    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate.to_f64())
    }

    /// fixed monthly installment; zero when principal or term is not positive
    pub fn monthly_payment(&self, principal: Money, months: u32) -> Money {
        if !principal.is_positive() || months == 0 {
            return Money::ZERO;
        }

        let periodic = self.periodic_rate();

        if periodic == 0.0 {
            return principal / Decimal::from(months);
        }

        let factor = (1.0 + periodic).powf(months as f64);
        let payment = principal.to_f64() * (periodic * factor) / (factor - 1.0);

        // single rounding to cents, straight from the float result
        let cents = (payment * 100.0).round();
        if !cents.is_finite() {
            return Money::ZERO;
        }
        Money::from_decimal(Decimal::new(cents as i64, 2))
    }
}

/// monthly payment for `principal` over `months` at the nominal `annual_rate`
pub fn monthly_payment(principal: Money, months: u32, annual_rate: Rate) -> Money {
    AmortizationCalculator::new(annual_rate).monthly_payment(principal, months)
}

fn effective_annual_rate(nominal: f64) -> f64 {
    // (1 + TNA/m)^m - 1
    (1.0 + nominal / PERIODS_PER_YEAR).powf(PERIODS_PER_YEAR) - 1.0
}

fn periodic_rate(nominal: f64) -> f64 {
    (1.0 + effective_annual_rate(nominal)).powf(YEAR_FRACTION) - 1.0
}
