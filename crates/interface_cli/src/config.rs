//! Shipping settings
//!
//! Loaded from an optional file and `YCWC_`-prefixed environment variables
//! (nested adapter settings use `__`, e.g. `YCWC_YANDEX__PRICING_TIMEOUT_SECS`).
//! Unset values fall back to [`ShippingSettings::default`].

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use validator::Validate;

use core_kernel::{Coordinates, Currency, DimensionUnit, WeightUnit};
use domain_quote::DEFAULT_SESSION_TTL_HOURS;
use infra_yandex::YandexConfig;

use crate::error::ShippingError;

#[derive(Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ShippingSettings {
    /// Cargo API OAuth token
    #[validate(length(min = 20, message = "OAuth token must be at least 20 characters"))]
    pub oauth_token: String,
    /// Geocoder API key; lookups are skipped when missing or too short
    pub maps_api_key: Option<String>,
    pub warehouse_address: String,
    #[validate(range(min = -180.0, max = 180.0))]
    pub warehouse_lon: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub warehouse_lat: f64,
    /// Contact name on the pickup point
    pub sender_name: String,
    pub sender_phone: String,
    /// Raises the default log level to `debug`
    pub debug: bool,
    /// Book a claim automatically when an order is placed
    pub auto_create_delivery: bool,
    /// Added to the provider price; may be negative
    pub base_markup: Decimal,
    /// Rate label shown at checkout
    pub rate_title: String,
    pub currency: Currency,
    /// Units the host catalogue records weights in
    pub weight_unit: WeightUnit,
    /// Units the host catalogue records dimensions in
    pub dimension_unit: DimensionUnit,
    /// Emit JSON log lines
    pub log_json: bool,
    pub session_ttl_hours: i64,
    pub yandex: YandexConfig,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            oauth_token: String::new(),
            maps_api_key: None,
            warehouse_address: String::new(),
            warehouse_lon: 0.0,
            warehouse_lat: 0.0,
            sender_name: "Store".to_string(),
            sender_phone: "+7".to_string(),
            debug: false,
            auto_create_delivery: false,
            base_markup: Decimal::ZERO,
            rate_title: "Yandex Delivery (cargo)".to_string(),
            currency: Currency::RUB,
            weight_unit: WeightUnit::Kg,
            dimension_unit: DimensionUnit::Cm,
            log_json: false,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            yandex: YandexConfig::default(),
        }
    }
}

impl fmt::Debug for ShippingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingSettings")
            .field("oauth_token", &redact(&self.oauth_token))
            .field("maps_api_key", &self.maps_api_key.as_deref().map(redact))
            .field("warehouse_address", &self.warehouse_address)
            .field("warehouse_lon", &self.warehouse_lon)
            .field("warehouse_lat", &self.warehouse_lat)
            .field("sender_name", &self.sender_name)
            .field("sender_phone", &self.sender_phone)
            .field("debug", &self.debug)
            .field("auto_create_delivery", &self.auto_create_delivery)
            .field("base_markup", &self.base_markup)
            .field("rate_title", &self.rate_title)
            .field("currency", &self.currency)
            .field("weight_unit", &self.weight_unit)
            .field("dimension_unit", &self.dimension_unit)
            .field("log_json", &self.log_json)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("yandex", &self.yandex)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "[EMPTY]"
    } else {
        "[REDACTED]"
    }
}

impl ShippingSettings {
    /// Loads settings from `path` (if given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(
                config::Environment::with_prefix("YCWC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Checks everything a workflow needs before any external call
    pub fn ensure_ready(&self) -> Result<(), ShippingError> {
        if self.oauth_token.trim().is_empty() {
            return Err(ShippingError::Configuration(
                "the delivery OAuth token is not configured".to_string(),
            ));
        }
        self.validate()?;
        if !self.has_warehouse() {
            return Err(ShippingError::Configuration(
                "warehouse coordinates are not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Zero on either axis counts as unset
    pub fn has_warehouse(&self) -> bool {
        self.warehouse_lon != 0.0 && self.warehouse_lat != 0.0
    }

    pub fn warehouse(&self) -> Coordinates {
        Coordinates::new(self.warehouse_lon, self.warehouse_lat)
    }

    /// Default tracing directive
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    /// Lifetime of a stored quote session, at least one hour
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours.max(1))
    }
}
