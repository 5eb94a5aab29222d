use serde::{Deserialize, Serialize};
use std::fmt;

/// identifier assigned by the application store
pub type ApplicationId = String;

/// pre-qualification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// provisionally approved
    Approved,
    /// needs manual review by an analyst
    Review,
    /// does not qualify
    Denied,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::Review => "review",
            DecisionStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// applicant marital status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

impl MaritalStatus {
    pub fn requires_spouse(&self) -> bool {
        matches!(self, MaritalStatus::Married)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&DecisionStatus::Review).unwrap(), "\"review\"");
        let parsed: DecisionStatus = serde_json::from_str("\"denied\"").unwrap();
        assert_eq!(parsed, DecisionStatus::Denied);
        assert_eq!(DecisionStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn test_marital_status_defaults_to_single() {
        assert_eq!(MaritalStatus::default(), MaritalStatus::Single);
        assert!(MaritalStatus::Married.requires_spouse());
        assert!(!MaritalStatus::Single.requires_spouse());
    }
}
