//! Geocoding Domain
//!
//! Turns host destination fields into a free-text address and resolves it
//! to coordinates through a [`GeocodingPort`](ports::GeocodingPort).
//!
//! # Resolution order
//!
//! ```text
//! normalised text -> address variants -> default city centre -> no match
//! ```
//!
//! A miss is an ordinary `None`, not an error. Callers decide whether a
//! shipment without coordinates can still be quoted.

pub mod address;
pub mod variants;
pub mod geocoder;
pub mod ports;
pub mod error;

pub use address::{normalize_address, Address, AddressFields};
pub use variants::address_variants;
pub use geocoder::{CityFallback, Geocoder, Resolution, ResolutionSource, MIN_API_KEY_LEN};
pub use ports::{GeocodeMatch, GeocodingPort};
pub use error::GeoError;
