//! Pre-built Test Fixtures
//!
//! Ready-to-use values for the warehouse, destinations and credentials.
//! They are consistent and predictable so assertions can name them.

use core_kernel::{Coordinates, SessionId};
use domain_geo::AddressFields;
use domain_quote::Waypoint;

/// Fixture for locations
pub struct GeoFixtures;

impl GeoFixtures {
    /// Warehouse coordinates
    pub fn warehouse() -> Coordinates {
        Coordinates::new(37.62, 55.75)
    }

    pub fn warehouse_address() -> &'static str {
        "Москва, Складская, 1"
    }

    pub fn warehouse_waypoint() -> Waypoint {
        Waypoint::new(Self::warehouse(), Self::warehouse_address())
    }

    /// Where [`Self::moscow_fields`] geocodes to
    pub fn tverskaya() -> Coordinates {
        Coordinates::new(37.6066, 55.7652)
    }

    /// Moscow destination as host fields
    pub fn moscow_fields() -> AddressFields {
        AddressFields {
            country: "RU".to_string(),
            city: "Москва".to_string(),
            address_1: "Тверская, 7".to_string(),
            ..AddressFields::default()
        }
    }

    /// Query the geocoder receives for [`Self::moscow_fields`]
    pub fn moscow_query() -> &'static str {
        "Москва, Тверская, 7"
    }

    /// Destination outside the default city
    pub fn kazan_fields() -> AddressFields {
        AddressFields {
            country: "RU".to_string(),
            city: "Казань".to_string(),
            address_1: "Баумана, 10".to_string(),
            ..AddressFields::default()
        }
    }

    pub fn moscow_centre() -> Coordinates {
        Coordinates::new(37.617635, 55.755814)
    }
}

/// Fixture for credentials and identifiers
pub struct CredentialFixtures;

impl CredentialFixtures {
    pub fn oauth_token() -> &'static str {
        "y0_AgAAAAB1234567890abcdef"
    }

    pub fn maps_api_key() -> &'static str {
        "maps-key-1234567890"
    }

    pub fn session_id() -> SessionId {
        SessionId::new("wc_session_7f3a")
    }
}
