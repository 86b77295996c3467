//! Application layer for cargo delivery
//!
//! Settings, the application error type, host data shapes and the
//! [`ShippingService`] workflows behind the `cargo-delivery` binary.

pub mod config;
pub mod error;
pub mod host;
pub mod records;
pub mod service;

pub use config::ShippingSettings;
pub use error::ShippingError;
pub use host::{Cart, CartLine, HostUnits, OrderSnapshot, ShippingLine};
pub use records::InMemoryOrderRecords;
pub use service::{DeliveryReport, ShippingPorts, ShippingService};
