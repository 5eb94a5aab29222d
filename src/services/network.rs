use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{PrequalError, Result};

/// sent to the scorer when the caller ip cannot be determined
pub const LOOPBACK_PLACEHOLDER: &str = "127.0.0.1";

/// per-request bound on the ip echo call, well under the client timeout
pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// best-effort source of the requester's public ip
pub trait CallerIpSource {
    fn resolve_ip(&self) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct IpPayload {
    ip: String,
}

/// ip echo service returning `{"ip": "..."}`
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpIpResolver {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: IP_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CallerIpSource for HttpIpResolver {
    async fn resolve_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let payload: IpPayload = response.json().await?;
        parse_ip(&payload.ip)
    }
}

/// a known address, e.g. taken from the inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIp(pub String);

impl CallerIpSource for FixedIp {
    async fn resolve_ip(&self) -> Result<String> {
        parse_ip(&self.0)
    }
}

fn parse_ip(raw: &str) -> Result<String> {
    let ip: IpAddr = raw.trim().parse().map_err(|_| PrequalError::CallerIp {
        message: format!("not an ip address: {raw}"),
    })?;
    Ok(ip.to_string())
}
