pub mod amortization;

use serde::{Deserialize, Serialize};

use crate::application::LoanRequest;
use crate::decimal::{Money, Rate};

pub use amortization::{monthly_payment, AmortizationCalculator};

/// live estimate shown while the applicant tunes the loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub vehicle_amount: Money,
    pub down_payment_pct: Rate,
    pub down_payment_amount: Money,
    pub financed_amount: Money,
    pub term_months: u32,
    pub annual_rate: Rate,
    pub monthly_payment: Money,
}

impl PaymentQuote {
    /// quote a loan; parameters are clamped to their ranges first
    pub fn for_loan(loan: &LoanRequest, calculator: &AmortizationCalculator) -> Self {
        let loan = loan.clamped();
        let down_payment_amount = loan.down_payment_amount();
        let financed_amount = loan.vehicle_amount - down_payment_amount;

        Self {
            vehicle_amount: loan.vehicle_amount,
            down_payment_pct: loan.down_payment_pct,
            down_payment_amount,
            financed_amount,
            term_months: loan.term_months,
            annual_rate: calculator.annual_rate(),
            monthly_payment: calculator.monthly_payment(financed_amount, loan.term_months),
        }
    }

    /// sum of all installments
    pub fn total_of_payments(&self) -> Money {
        self.monthly_payment * rust_decimal::Decimal::from(self.term_months)
    }

    /// financing cost over the financed amount
    pub fn total_interest(&self) -> Money {
        (self.total_of_payments() - self.financed_amount).max(Money::ZERO)
    }
}
