use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::validation::is_id_shaped;
use crate::config::IdentityConfig;
use crate::errors::{PrequalError, Result};

use super::excerpt;

/// names returned for a national id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentityRecord {
    pub given_names: Option<String>,
    pub family_names: Option<String>,
    pub full_name: Option<String>,
}

impl IdentityRecord {
    /// combined name, else family names followed by given names
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = non_blank(self.full_name.as_deref()) {
            return Some(full.to_string());
        }

        let parts: Vec<&str> = [self.family_names.as_deref(), self.given_names.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// the service nests its payload under `response`, `data` or `result`, or not at all
    pub fn from_payload(body: &Value) -> Self {
        let payload = ["response", "data", "result"]
            .iter()
            .find_map(|key| body.get(*key).filter(|v| v.is_object()))
            .unwrap_or(body);

        let text = |key: &str| {
            payload
                .get(key)
                .or_else(|| body.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            given_names: text("nombres"),
            family_names: text("apellidos"),
            full_name: text("nombreCompleto"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// national-id lookup used to autofill the applicant's name
pub trait IdentityLookup {
    fn lookup_identity(&self, id_number: &str) -> impl Future<Output = Result<IdentityRecord>> + Send;
}

/// bearer-authenticated GET `{base}/{id}`
#[derive(Debug, Clone)]
pub struct HttpIdentityLookup {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpIdentityLookup {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &IdentityConfig) -> Result<Self> {
        match (&config.base_url, &config.token) {
            (Some(base_url), Some(token)) => Ok(Self::new(client, base_url.clone(), token.clone())),
            _ => Err(PrequalError::InvalidConfiguration {
                message: "identity lookup needs PREQUAL_IDENTITY_BASE_URL and PREQUAL_IDENTITY_TOKEN".to_string(),
            }),
        }
    }
}

impl IdentityLookup for HttpIdentityLookup {
    async fn lookup_identity(&self, id_number: &str) -> Result<IdentityRecord> {
        if !is_id_shaped(id_number) {
            return Err(PrequalError::InvalidIdNumber {
                id: id_number.to_string(),
            });
        }

        let url = format!("{}/{}", self.base_url, id_number);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Value = serde_json::from_str(&body).map_err(|_| PrequalError::IdentityLookup {
            message: format!("response is not valid JSON: {}", excerpt(&body)),
        })?;

        if !status.is_success() {
            let detail = parsed
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(PrequalError::IdentityLookup {
                message: format!("status {}: {}", status.as_u16(), detail),
            });
        }

        Ok(IdentityRecord::from_payload(&parsed))
    }
}

const MOCK_GIVEN_NAMES: [&str; 5] = ["MARIA JOSE", "CARLOS ANDRES", "ANA LUCIA", "JUAN PABLO", "DIANA CAROLINA"];
const MOCK_FAMILY_NAMES: [&str; 5] = ["ANDRADE LOPEZ", "CEVALLOS MORA", "PAREDES VEGA", "SALAZAR RUIZ", "TORRES IBARRA"];

/// deterministic names for local testing
#[derive(Debug, Clone, Copy, Default)]
pub struct MockIdentityLookup;

impl MockIdentityLookup {
    pub fn record_for(id_number: &str) -> IdentityRecord {
        let sum: usize = id_number
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| (b - b'0') as usize)
            .sum();
        let given = MOCK_GIVEN_NAMES[sum % MOCK_GIVEN_NAMES.len()];
        let family = MOCK_FAMILY_NAMES[(sum / MOCK_GIVEN_NAMES.len()) % MOCK_FAMILY_NAMES.len()];

        IdentityRecord {
            given_names: Some(given.to_string()),
            family_names: Some(family.to_string()),
            full_name: Some(format!("{family} {given}")),
        }
    }
}

impl IdentityLookup for MockIdentityLookup {
    async fn lookup_identity(&self, id_number: &str) -> Result<IdentityRecord> {
        if !is_id_shaped(id_number) {
            return Err(PrequalError::InvalidIdNumber {
                id: id_number.to_string(),
            });
        }
        Ok(Self::record_for(id_number))
    }
}

/// the lookup selected by configuration
#[derive(Debug, Clone)]
pub enum IdentityProvider {
    Http(HttpIdentityLookup),
    Mock(MockIdentityLookup),
}

impl IdentityProvider {
    pub fn from_config(client: reqwest::Client, config: &IdentityConfig) -> Result<Self> {
        if config.use_mock {
            debug!("identity lookup mocked");
            return Ok(IdentityProvider::Mock(MockIdentityLookup));
        }
        Ok(IdentityProvider::Http(HttpIdentityLookup::from_config(client, config)?))
    }
}

impl IdentityLookup for IdentityProvider {
    async fn lookup_identity(&self, id_number: &str) -> Result<IdentityRecord> {
        match self {
            IdentityProvider::Http(lookup) => lookup.lookup_identity(id_number).await,
            IdentityProvider::Mock(lookup) => lookup.lookup_identity(id_number).await,
        }
    }
}

/// name to prefill, or `None` when the lookup fails in any way
pub async fn autofill_full_name<L: IdentityLookup>(lookup: &L, id_number: &str) -> Option<String> {
    match lookup.lookup_identity(id_number).await {
        Ok(record) => {
            let name = record.display_name();
            if name.is_none() {
                let err = PrequalError::IdentityNotFound {
                    id: id_number.to_string(),
                };
                warn!(error = %err, "could not autofill");
            }
            name
        }
        Err(err) => {
            warn!(error = %err, "could not autofill");
            None
        }
    }
}
