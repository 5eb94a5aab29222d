pub mod identity;
pub mod network;
pub mod scoring;
pub mod store;

use crate::config::NetworkConfig;
use crate::errors::Result;

pub use identity::{
    autofill_full_name, HttpIdentityLookup, IdentityLookup, IdentityProvider, IdentityRecord,
    MockIdentityLookup,
};
pub use network::{CallerIpSource, FixedIp, HttpIpResolver, LOOPBACK_PLACEHOLDER};
pub use scoring::{HttpScorer, Scorer, ScorerMessage, ScoringRequest, ScoringResponse};
pub use store::{ApplicationRecord, ApplicationStore, HttpApplicationStore, MemoryApplicationStore};

const USER_AGENT: &str = concat!("vehicle-prequal/", env!("CARGO_PKG_VERSION"));

/// one client for every collaborator, bounded by the configured timeout
pub fn http_client(config: &NetworkConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// short excerpt of a response body for error messages
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
