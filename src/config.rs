use std::env;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::decimal::Rate;
use crate::errors::{PrequalError, Result};

/// nominal annual rate (TNA) used for payment estimates
pub const DEFAULT_ANNUAL_RATE: Decimal = dec!(0.156);

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// top-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub scorer: ScorerConfig,
    pub store: StoreConfig,
    pub network: NetworkConfig,
    pub pricing: PricingConfig,
    pub telemetry: TelemetryConfig,
}

/// national-id lookup service
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    /// serve deterministic mock names instead of calling the service
    pub use_mock: bool,
}

/// remote scoring endpoint
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub url: String,
    pub quote_code: String,
}

/// hosted document store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub collection_url: String,
    pub token: Option<String>,
}

/// shared http settings
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout: Duration,
    pub ip_lookup_url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    pub annual_rate: Rate,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            annual_rate: Rate::from_decimal(DEFAULT_ANNUAL_RATE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// load from `.env` and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let use_mock = match get("PREQUAL_IDENTITY_MOCK") {
            Some(value) => parse_bool("PREQUAL_IDENTITY_MOCK", &value)?,
            None => false,
        };

        let identity = IdentityConfig {
            base_url: get("PREQUAL_IDENTITY_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            token: get("PREQUAL_IDENTITY_TOKEN"),
            use_mock,
        };

        let scorer = ScorerConfig {
            url: get("PREQUAL_SCORER_URL").ok_or_else(|| missing("PREQUAL_SCORER_URL"))?,
            quote_code: get("PREQUAL_QUOTE_CODE").ok_or_else(|| missing("PREQUAL_QUOTE_CODE"))?,
        };

        let store = StoreConfig {
            collection_url: get("PREQUAL_STORE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .ok_or_else(|| missing("PREQUAL_STORE_URL"))?,
            token: get("PREQUAL_STORE_TOKEN"),
        };

        let timeout_secs = match get("PREQUAL_HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                PrequalError::InvalidConfiguration {
                    message: format!("PREQUAL_HTTP_TIMEOUT_SECS must be a positive integer, got {value}"),
                }
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let network = NetworkConfig {
            timeout: Duration::from_secs(timeout_secs),
            ip_lookup_url: get("PREQUAL_IP_LOOKUP_URL").unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_string()),
        };

        let annual_rate = match get("PREQUAL_ANNUAL_RATE") {
            Some(value) => {
                let rate = Decimal::from_str(&value).map_err(|_| PrequalError::InvalidConfiguration {
                    message: format!("PREQUAL_ANNUAL_RATE must be a decimal fraction, got {value}"),
                })?;
                if rate.is_sign_negative() || rate >= Decimal::ONE {
                    return Err(PrequalError::InvalidConfiguration {
                        message: format!("PREQUAL_ANNUAL_RATE must be in [0, 1), got {value}"),
                    });
                }
                Rate::from_decimal(rate)
            }
            None => Rate::from_decimal(DEFAULT_ANNUAL_RATE),
        };

        let telemetry = TelemetryConfig {
            log_level: get("PREQUAL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            identity,
            scorer,
            store,
            network,
            pricing: PricingConfig { annual_rate },
            telemetry,
        })
    }
}

fn missing(key: &str) -> PrequalError {
    PrequalError::InvalidConfiguration {
        message: format!("{key} is not set"),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PrequalError::InvalidConfiguration {
            message: format!("{key} must be a boolean, got {value}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PREQUAL_SCORER_URL", "https://scoring.example.com/precalificar"),
            ("PREQUAL_QUOTE_CODE", "AUTO-01"),
            ("PREQUAL_STORE_URL", "https://store.example.com/applications/"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&required())).unwrap();

        assert_eq!(config.network.timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
        assert_eq!(config.network.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(config.pricing.annual_rate, Rate::from_decimal(dec!(0.156)));
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.store.collection_url, "https://store.example.com/applications");
        assert!(!config.identity.use_mock);
        assert!(config.identity.base_url.is_none());
    }

    #[test]
    fn test_overrides_parsed() {
        let mut pairs = required();
        pairs.extend([
            ("PREQUAL_IDENTITY_BASE_URL", "https://id.example.com/cedula/"),
            ("PREQUAL_IDENTITY_TOKEN", "secret"),
            ("PREQUAL_IDENTITY_MOCK", "true"),
            ("PREQUAL_HTTP_TIMEOUT_SECS", "5"),
            ("PREQUAL_ANNUAL_RATE", "0.12"),
            ("PREQUAL_LOG_LEVEL", "debug"),
        ]);

        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.identity.base_url.as_deref(), Some("https://id.example.com/cedula"));
        assert_eq!(config.identity.token.as_deref(), Some("secret"));
        assert!(config.identity.use_mock);
        assert_eq!(config.network.timeout, Duration::from_secs(5));
        assert_eq!(config.pricing.annual_rate, Rate::from_percentage(12));
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_missing_scorer_url_rejected() {
        let pairs = vec![("PREQUAL_QUOTE_CODE", "AUTO-01"), ("PREQUAL_STORE_URL", "https://store")];
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("PREQUAL_SCORER_URL"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut pairs = required();
        pairs.push(("PREQUAL_HTTP_TIMEOUT_SECS", "0"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = required();
        pairs.push(("PREQUAL_ANNUAL_RATE", "15.6"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = required();
        pairs.push(("PREQUAL_IDENTITY_MOCK", "maybe"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
