use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::application::{Applicant, LoanRequest};
use crate::config::StoreConfig;
use crate::errors::{PrequalError, Result};
use crate::types::{ApplicationId, DecisionStatus};

use super::excerpt;

/// write-once application document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub applicant: Applicant,
    pub loan: LoanRequest,
    pub status: DecisionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn new(applicant: Applicant, loan: LoanRequest, status: DecisionStatus, now: DateTime<Utc>) -> Self {
        Self {
            applicant,
            loan,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// hosted document store holding submitted applications
pub trait ApplicationStore {
    fn persist(&self, record: &ApplicationRecord) -> impl Future<Output = Result<ApplicationId>> + Send;

    fn update_status(
        &self,
        id: &str,
        status: DecisionStatus,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// in-process store with uuid v4 ids
#[derive(Debug, Default)]
pub struct MemoryApplicationStore {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<ApplicationRecord> {
        self.records().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<ApplicationId, ApplicationRecord>>> {
        self.records.lock().map_err(|_| PrequalError::Persistence {
            message: "store lock poisoned".to_string(),
        })
    }
}

impl ApplicationStore for MemoryApplicationStore {
    async fn persist(&self, record: &ApplicationRecord) -> Result<ApplicationId> {
        let id = Uuid::new_v4().to_string();
        self.records()?.insert(id.clone(), record.clone());
        Ok(id)
    }

    async fn update_status(&self, id: &str, status: DecisionStatus, updated_at: DateTime<Utc>) -> Result<()> {
        let mut records = self.records()?;
        let record = records.get_mut(id).ok_or_else(|| PrequalError::Persistence {
            message: format!("no application {id}"),
        })?;
        record.status = status;
        record.updated_at = updated_at;
        Ok(())
    }
}

/// REST collection: POST creates, PATCH `{collection}/{id}` updates
#[derive(Debug, Clone)]
pub struct HttpApplicationStore {
    client: reqwest::Client,
    collection_url: String,
    token: Option<String>,
}

impl HttpApplicationStore {
    pub fn new(client: reqwest::Client, collection_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            collection_url: collection_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &StoreConfig) -> Self {
        Self::new(client, config.collection_url.clone(), config.token.clone())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// generated id from `id`, or the last segment of a resource `name`
pub fn document_id(body: &Value) -> Option<ApplicationId> {
    if let Some(id) = body.get("id").and_then(Value::as_str).filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    body.get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl ApplicationStore for HttpApplicationStore {
    async fn persist(&self, record: &ApplicationRecord) -> Result<ApplicationId> {
        let request = self
            .client
            .post(&self.collection_url)
            .header("Accept", "application/json")
            .json(record);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PrequalError::Persistence {
                message: format!("status {}: {}", status.as_u16(), excerpt(&body)),
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;
        document_id(&parsed).ok_or_else(|| PrequalError::Persistence {
            message: format!("no document id in response: {}", excerpt(&body)),
        })
    }

    async fn update_status(&self, id: &str, status: DecisionStatus, updated_at: DateTime<Utc>) -> Result<()> {
        let url = format!("{}/{}", self.collection_url, id);
        let request = self
            .client
            .patch(&url)
            .json(&json!({ "status": status, "updatedAt": updated_at }));
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            return Err(PrequalError::Persistence {
                message: format!("status update for {id} failed with {}", response.status().as_u16()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ApplicationRecord {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        ApplicationRecord::new(Applicant::default(), LoanRequest::default(), DecisionStatus::Review, now)
    }

    #[tokio::test]
    async fn test_memory_store_persist_and_update() {
        let store = MemoryApplicationStore::new();
        let id = store.persist(&record()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().status, DecisionStatus::Review);

        let later = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        store.update_status(&id, DecisionStatus::Approved, later).await.unwrap();

        let updated = store.get(&id).unwrap();
        assert_eq!(updated.status, DecisionStatus::Approved);
        assert_eq!(updated.updated_at, later);
        assert!(updated.created_at < updated.updated_at);
    }

    #[tokio::test]
    async fn test_memory_store_unknown_id() {
        let store = MemoryApplicationStore::new();
        let result = store.update_status("missing", DecisionStatus::Denied, Utc::now()).await;
        assert!(matches!(result, Err(PrequalError::Persistence { .. })));
    }

    #[test]
    fn test_document_id_extraction() {
        assert_eq!(document_id(&json!({"id": "abc123"})).as_deref(), Some("abc123"));
        assert_eq!(
            document_id(&json!({"name": "projects/p/databases/(default)/documents/applications/Xy9"})).as_deref(),
            Some("Xy9")
        );
        assert_eq!(document_id(&json!({"name": "applications/"})), None);
        assert_eq!(document_id(&json!({})), None);
    }

    #[test]
    fn test_record_document_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["status"], "review");
        assert!(json["createdAt"].is_string());
        assert!(json["applicant"]["maritalStatus"].is_string());
        assert!(json["loan"]["termMonths"].is_number());
        assert!(json["loan"]["vehicleAmount"].is_number());
        assert!(json["loan"]["downPaymentPct"].is_number());
    }

    #[tokio::test]
    async fn test_unreachable_http_store_errors() {
        let store = HttpApplicationStore::new(reqwest::Client::new(), "http://127.0.0.1:9/applications/", None);
        assert!(store.persist(&record()).await.is_err());
    }
}
