//! Adapter configuration
//!
//! Endpoints and per-call timeouts. Credentials are not part of this struct:
//! the OAuth token is handed to [`YandexCargoClient::new`](crate::YandexCargoClient::new)
//! and the maps key travels with each geocoding call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production cargo API host
pub const DEFAULT_CARGO_BASE_URL: &str = "https://b2b.taxi.yandex.net";
/// Production geocoder host
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://geocode-maps.yandex.ru";

/// Endpoints and timeouts for the Yandex adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YandexConfig {
    pub cargo_base_url: String,
    pub geocoder_base_url: String,
    /// Offer calculation timeout in seconds
    pub pricing_timeout_secs: u64,
    /// Claim creation timeout in seconds
    pub claim_create_timeout_secs: u64,
    /// Claim acceptance timeout in seconds
    pub claim_accept_timeout_secs: u64,
    /// Geocoding timeout in seconds
    pub geocode_timeout_secs: u64,
    /// Value of the `Accept-Language` header
    pub accept_language: String,
}

impl Default for YandexConfig {
    fn default() -> Self {
        Self {
            cargo_base_url: DEFAULT_CARGO_BASE_URL.to_string(),
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            pricing_timeout_secs: 25,
            claim_create_timeout_secs: 30,
            claim_accept_timeout_secs: 20,
            geocode_timeout_secs: 15,
            accept_language: "ru-RU".to_string(),
        }
    }
}

impl YandexConfig {
    /// Points both services at one host, as the HTTP tests do
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            cargo_base_url: base_url.clone(),
            geocoder_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn pricing_timeout(&self) -> Duration {
        Duration::from_secs(self.pricing_timeout_secs)
    }

    pub fn claim_create_timeout(&self) -> Duration {
        Duration::from_secs(self.claim_create_timeout_secs)
    }

    pub fn claim_accept_timeout(&self) -> Duration {
        Duration::from_secs(self.claim_accept_timeout_secs)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_secs)
    }
}
