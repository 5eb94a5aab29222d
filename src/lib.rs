pub mod application;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payments;
pub mod prequal;
pub mod services;
pub mod telemetry;
pub mod types;

// re-export key types
pub use application::{Applicant, Application, LoanLimits, LoanRequest, SessionStore};
pub use config::AppConfig;
pub use decimal::{Money, Rate};
pub use errors::{PrequalError, Result};
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use payments::{monthly_payment, AmortizationCalculator, PaymentQuote};
pub use prequal::{
    local_decision, HttpDecider, PrequalificationDecider, PrequalificationResult, Verdict,
};
pub use services::{
    autofill_full_name, ApplicationStore, CallerIpSource, IdentityLookup, IdentityProvider, Scorer,
};
pub use types::{ApplicationId, DecisionStatus, MaritalStatus};
