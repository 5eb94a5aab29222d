use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::MaritalStatus;

use super::validation;

/// applicant identity and contact details collected on the first step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Applicant {
    pub id_number: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub marital_status: MaritalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
}

impl Applicant {
    /// check every field; the first failure is reported
    pub fn validate(&self) -> Result<()> {
        validation::validate_national_id(&self.id_number)?;
        validation::validate_full_name(&self.full_name)?;
        validation::validate_phone(&self.phone)?;
        validation::validate_email(&self.email)?;
        validation::validate_spouse_id(
            self.spouse_id.as_deref(),
            self.marital_status.requires_spouse(),
        )
    }

    /// trimmed copy, with blank spouse ids dropped and single applicants cleared
    pub fn normalized(&self) -> Self {
        let spouse_id = if self.marital_status.requires_spouse() {
            self.spouse_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        } else {
            None
        };

        Self {
            id_number: self.id_number.trim().to_string(),
            full_name: self.full_name.split_whitespace().collect::<Vec<_>>().join(" "),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            marital_status: self.marital_status,
            spouse_id,
        }
    }

    /// take the name from an identity lookup; blank results leave it untouched
    pub fn apply_autofill(&mut self, full_name: Option<String>) -> bool {
        match full_name {
            Some(name) if !name.trim().is_empty() => {
                self.full_name = name.trim().to_string();
                true
            }
            _ => false,
        }
    }
}
