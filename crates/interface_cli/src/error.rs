//! Application error taxonomy
//!
//! Domain and adapter errors are folded into [`ShippingError`] at the
//! workflow boundary. Failures of a single pricing attempt or geocoding
//! variant never reach this type; they are absorbed and logged where they
//! happen.

use thiserror::Error;

use core_kernel::PortError;
use domain_cargo::{CandidateClass, CargoError};
use domain_geo::GeoError;
use domain_quote::QuoteError;
use infra_yandex::YandexError;

#[derive(Debug, Error)]
pub enum ShippingError {
    /// Settings are missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The shipment or destination cannot be delivered as given
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not determine coordinates for address: {address}")]
    GeocodeMiss { address: String },

    #[error("No delivery offers for classes {}", format_classes(.tried))]
    QuoteUnavailable { tried: Vec<CandidateClass> },

    /// Timeout or network failure on a call that had no fallback
    #[error("Transport error: {0}")]
    Transport(#[source] PortError),

    /// Structured refusal from the provider
    #[error("Delivery API error: {message}")]
    Provider { status: Option<u16>, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShippingError {
    /// True for errors caused by settings rather than the shipment
    pub fn is_configuration(&self) -> bool {
        matches!(self, ShippingError::Configuration(_))
    }
}

fn format_classes(classes: &[CandidateClass]) -> String {
    classes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<CargoError> for ShippingError {
    fn from(err: CargoError) -> Self {
        match err {
            CargoError::InvalidTierTable(_) | CargoError::UnknownClass(_) => {
                ShippingError::Configuration(err.to_string())
            }
            other => ShippingError::Validation(other.to_string()),
        }
    }
}

impl From<GeoError> for ShippingError {
    fn from(err: GeoError) -> Self {
        ShippingError::Validation(err.to_string())
    }
}

impl From<QuoteError> for ShippingError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::NoCandidates => ShippingError::QuoteUnavailable { tried: Vec::new() },
            QuoteError::Unavailable { tried } => ShippingError::QuoteUnavailable { tried },
        }
    }
}

impl From<PortError> for ShippingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Provider { status, ref message, .. } => ShippingError::Provider {
                status,
                message: message.clone(),
            },
            PortError::Unauthorized { ref message } => ShippingError::Provider {
                status: None,
                message: message.clone(),
            },
            PortError::Validation { message, .. } => ShippingError::Validation(message),
            other if other.is_transient() => ShippingError::Transport(other),
            other => ShippingError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ShippingError {
    fn from(err: validator::ValidationErrors) -> Self {
        ShippingError::Configuration(err.to_string())
    }
}

impl From<config::ConfigError> for ShippingError {
    fn from(err: config::ConfigError) -> Self {
        ShippingError::Configuration(err.to_string())
    }
}

impl From<YandexError> for ShippingError {
    fn from(err: YandexError) -> Self {
        ShippingError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_cargo::CargoClass;

    #[test]
    fn test_cargo_errors_are_validation() {
        let err: ShippingError = CargoError::EmptyShipment.into();
        assert!(matches!(err, ShippingError::Validation(_)));

        let err: ShippingError = CargoError::UnknownClass("truck".into()).into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_quote_unavailable_lists_classes() {
        let err: ShippingError = QuoteError::Unavailable {
            tried: vec![
                CandidateClass::Tier(CargoClass::Van),
                CandidateClass::Tier(CargoClass::LcvM),
            ],
        }
        .into();
        assert_eq!(err.to_string(), "No delivery offers for classes van, lcv_m");
    }

    #[test]
    fn test_port_errors_split_by_kind() {
        let err: ShippingError = PortError::provider(Some(400), None, "Некорректный адрес").into();
        assert_eq!(err.to_string(), "Delivery API error: Некорректный адрес");

        let err: ShippingError = PortError::Timeout {
            operation: "claims/create".into(),
            duration_ms: 30_000,
        }
        .into();
        assert!(matches!(err, ShippingError::Transport(_)));

        let err: ShippingError = PortError::transformation("bad json").into();
        assert!(matches!(err, ShippingError::Internal(_)));
    }
}
