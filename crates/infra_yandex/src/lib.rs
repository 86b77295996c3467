//! Infrastructure Yandex Layer
//!
//! HTTP adapters for the external services the delivery workflows talk to:
//!
//! - [`YandexCargoClient`] implements `PricingPort` (offer calculation) and
//!   `ClaimPort` (claim creation and acceptance)
//! - [`YandexGeocoderClient`] implements `GeocodingPort`
//!
//! Every call carries its own timeout, sends `Accept-Language: ru-RU` and
//! reports failures as `core_kernel::PortError` so the domain crates never
//! see `reqwest` types.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_yandex::{YandexCargoClient, YandexConfig};
//! use std::sync::Arc;
//!
//! let client = Arc::new(YandexCargoClient::new(&YandexConfig::default(), oauth_token)?);
//! let negotiator = QuoteNegotiator::new(client.clone());
//! let submitter = ClaimSubmitter::new(client, records);
//! ```

pub mod config;
pub mod error;
pub mod dto;
pub mod cargo_client;
pub mod geocoder_client;

pub use config::YandexConfig;
pub use error::YandexError;
pub use cargo_client::YandexCargoClient;
pub use geocoder_client::YandexGeocoderClient;
