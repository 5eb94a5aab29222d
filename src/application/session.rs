use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::{PrequalError, Result};

use super::{Applicant, Application, LoanRequest};

/// explicit load/save boundary for the in-progress draft
pub trait SessionStore {
    /// raw stored document, if any
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, document: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// stored draft migrated onto defaults; unreadable documents load as defaults
    fn load(&self) -> Result<Application> {
        Ok(match self.read()? {
            Some(document) => migrate(&document),
            None => Application::default(),
        })
    }

    fn save(&self, application: &Application) -> Result<()> {
        let document = serde_json::to_string(application)?;
        self.write(&document)
    }
}

/// field-by-field migration so older or partial drafts keep what they can
pub fn migrate(document: &str) -> Application {
    let raw: Value = match serde_json::from_str(document) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "discarding unreadable session draft");
            return Application::default();
        }
    };

    let defaults = Application::default();
    let applicant = raw.get("applicant");
    let loan = raw.get("loan");

    Application {
        applicant: Applicant {
            id_number: field(applicant, "idNumber").unwrap_or(defaults.applicant.id_number),
            full_name: field(applicant, "fullName").unwrap_or(defaults.applicant.full_name),
            phone: field(applicant, "phone").unwrap_or(defaults.applicant.phone),
            email: field(applicant, "email").unwrap_or(defaults.applicant.email),
            marital_status: field(applicant, "maritalStatus").unwrap_or(defaults.applicant.marital_status),
            spouse_id: field::<Option<String>>(applicant, "spouseId")
                .flatten()
                .filter(|s| !s.is_empty()),
        },
        loan: LoanRequest {
            vehicle_amount: field(loan, "vehicleAmount").unwrap_or(defaults.loan.vehicle_amount),
            down_payment_pct: field(loan, "downPaymentPct").unwrap_or(defaults.loan.down_payment_pct),
            term_months: field(loan, "termMonths").unwrap_or(defaults.loan.term_months),
        },
    }
}

fn field<T: DeserializeOwned>(section: Option<&Value>, key: &str) -> Option<T> {
    section
        .and_then(|s| s.get(key))
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// process-local store, the equivalent of a browser session
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    document: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.document.lock().map_err(|_| PrequalError::Session {
            message: "session lock poisoned".to_string(),
        })
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn write(&self, document: &str) -> Result<()> {
        *self.slot()? = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// json file on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, document)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::types::MaritalStatus;

    fn draft() -> Application {
        Application {
            applicant: Applicant {
                id_number: "1710034065".to_string(),
                full_name: "Ana Perez".to_string(),
                phone: "0991234567".to_string(),
                email: "ana@example.com".to_string(),
                marital_status: MaritalStatus::Married,
                spouse_id: Some("0926687856".to_string()),
            },
            loan: LoanRequest::new(Money::from_major(22_000), Rate::from_percentage(30), 60),
        }
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemorySessionStore::new();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, Application::default());
        assert_eq!(loaded.loan.vehicle_amount, Money::from_major(15_000));
        assert_eq!(loaded.loan.term_months, 48);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemorySessionStore::new();
        store.save(&draft()).unwrap();
        assert_eq!(store.load().unwrap(), draft());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Application::default());
    }

    #[test]
    fn test_partial_document_migrates() {
        // drafts saved before contact fields existed
        let legacy = r#"{
            "applicant": {"idNumber": "1710034065", "fullName": "Ana Perez", "maritalStatus": "single", "spouseId": ""},
            "loan": {"vehicleAmount": 18000, "termMonths": 36}
        }"#;

        let migrated = migrate(legacy);
        assert_eq!(migrated.applicant.id_number, "1710034065");
        assert_eq!(migrated.applicant.phone, "");
        assert_eq!(migrated.applicant.spouse_id, None);
        assert_eq!(migrated.loan.vehicle_amount, Money::from_major(18_000));
        assert_eq!(migrated.loan.down_payment_pct, Rate::from_percentage(20));
        assert_eq!(migrated.loan.term_months, 36);
    }

    #[test]
    fn test_bad_field_falls_back_alone() {
        let doc = r#"{"applicant": {"fullName": "Ana", "maritalStatus": "widowed"}, "loan": {"termMonths": "soon"}}"#;
        let migrated = migrate(doc);

        assert_eq!(migrated.applicant.full_name, "Ana");
        assert_eq!(migrated.applicant.marital_status, MaritalStatus::Single);
        assert_eq!(migrated.loan.term_months, 48);
    }

    #[test]
    fn test_corrupt_document_loads_defaults() {
        let store = MemorySessionStore::new();
        store.write("{not json").unwrap();
        assert_eq!(store.load().unwrap(), Application::default());
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("prequal-session-{}", uuid::Uuid::new_v4()))
            .join("draft.json");
        let store = FileSessionStore::new(&path);

        assert_eq!(store.load().unwrap(), Application::default());

        store.save(&draft()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), draft());

        store.clear().unwrap();
        assert!(!path.exists());
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
