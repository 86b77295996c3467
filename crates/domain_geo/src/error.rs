//! Geocoding domain errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoError {
    #[error("Destination address is empty")]
    EmptyAddress,
}
