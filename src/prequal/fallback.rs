use rust_decimal_macros::dec;

use crate::application::LoanRequest;
use crate::decimal::Money;
use crate::types::DecisionStatus;

/// financed ceiling for automatic approval
pub const APPROVAL_CEILING: Money = Money::from_decimal_const(dec!(16000));
/// longest term eligible for automatic approval
pub const APPROVAL_MAX_TERM_MONTHS: u32 = 60;
/// financed ceiling for manual review; anything above is denied
pub const REVIEW_CEILING: Money = Money::from_decimal_const(dec!(25000));

/// local threshold policy used when the scorer is unavailable
pub fn local_decision(loan: &LoanRequest) -> DecisionStatus {
    let loan = loan.clamped();
    let financed = loan.financed_share();

    if financed <= APPROVAL_CEILING && loan.term_months <= APPROVAL_MAX_TERM_MONTHS {
        DecisionStatus::Approved
    } else if financed <= REVIEW_CEILING {
        DecisionStatus::Review
    } else {
        DecisionStatus::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;

    fn loan(amount: i64, pct: u32, term: u32) -> LoanRequest {
        LoanRequest::new(Money::from_major(amount), Rate::from_percentage(pct), term)
    }

    #[test]
    fn test_small_short_loan_approved() {
        assert_eq!(local_decision(&loan(20_000, 50, 48)), DecisionStatus::Approved);
    }

    #[test]
    fn test_long_term_drops_to_review() {
        // financed 24000, term above 60
        assert_eq!(local_decision(&loan(30_000, 20, 72)), DecisionStatus::Review);
        // financed 12000 would be approved at 60 months
        assert_eq!(local_decision(&loan(15_000, 20, 60)), DecisionStatus::Approved);
        assert_eq!(local_decision(&loan(15_000, 20, 63)), DecisionStatus::Review);
    }

    #[test]
    fn test_large_loan_denied() {
        assert_eq!(local_decision(&loan(40_000, 20, 72)), DecisionStatus::Denied);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(local_decision(&loan(20_000, 20, 60)), DecisionStatus::Approved);
        assert_eq!(local_decision(&loan(31_250, 20, 36)), DecisionStatus::Review);
        assert_eq!(local_decision(&loan(31_300, 20, 36)), DecisionStatus::Denied);
    }

    #[test]
    fn test_inputs_clamped_first() {
        // 10% down is raised to 20%: 20000 * 0.8 = 16000
        assert_eq!(local_decision(&loan(20_000, 10, 48)), DecisionStatus::Approved);
        // 6 months is raised to 12
        assert_eq!(local_decision(&loan(20_000, 50, 6)), DecisionStatus::Approved);
    }
}
