pub mod applicant;
pub mod loan;
pub mod session;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use applicant::Applicant;
pub use loan::{LoanLimits, LoanRequest};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

/// draft assembled across the identity and loan steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Application {
    pub applicant: Applicant,
    pub loan: LoanRequest,
}

impl Application {
    pub fn new(applicant: Applicant, loan: LoanRequest) -> Self {
        Self { applicant, loan }
    }

    /// everything the decision step needs is present and consistent
    pub fn validate(&self) -> Result<()> {
        self.applicant.validate()?;
        self.loan.validate()
    }

    /// normalized applicant and clamped loan
    pub fn prepared(&self) -> Self {
        Self {
            applicant: self.applicant.normalized(),
            loan: self.loan.clamped(),
        }
    }
}
