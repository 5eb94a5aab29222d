use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum PrequalError {
    #[error("invalid national id: {id}")]
    InvalidIdNumber {
        id: String,
    },

    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("full name too short: {name:?}")]
    InvalidFullName {
        name: String,
    },

    #[error("invalid phone number: {phone}")]
    InvalidPhone {
        phone: String,
    },

    #[error("invalid email address: {email}")]
    InvalidEmail {
        email: String,
    },

    #[error("spouse id required for married applicants")]
    SpouseIdRequired,

    #[error("invalid spouse id: {id}")]
    InvalidSpouseId {
        id: String,
    },

    #[error("spouse id given for a single applicant")]
    UnexpectedSpouseId,

    #[error("invalid vehicle amount: {amount}")]
    InvalidVehicleAmount {
        amount: Money,
    },

    #[error("identity lookup failed: {message}")]
    IdentityLookup {
        message: String,
    },

    #[error("identity lookup returned no name for {id}")]
    IdentityNotFound {
        id: String,
    },

    #[error("scorer rejected request: http status {status}")]
    ScorerRejected {
        status: u16,
    },

    #[error("scorer reported an error: {message}")]
    ScorerReportedError {
        message: String,
    },

    #[error("malformed scorer response: {message}")]
    MalformedScorerResponse {
        message: String,
    },

    #[error("caller ip unavailable: {message}")]
    CallerIp {
        message: String,
    },

    #[error("persistence failed: {message}")]
    Persistence {
        message: String,
    },

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("session error: {message}")]
    Session {
        message: String,
    },

    #[error("telemetry error: {message}")]
    Telemetry {
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrequalError {
    /// errors the caller reports synchronously against form input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PrequalError::InvalidIdNumber { .. }
                | PrequalError::MissingField { .. }
                | PrequalError::InvalidFullName { .. }
                | PrequalError::InvalidPhone { .. }
                | PrequalError::InvalidEmail { .. }
                | PrequalError::SpouseIdRequired
                | PrequalError::InvalidSpouseId { .. }
                | PrequalError::UnexpectedSpouseId
                | PrequalError::InvalidVehicleAmount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PrequalError>;
