//! Core Kernel - Foundational types shared by the cargo delivery crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Metric unit normalisation for host catalogue data
//! - Geographic coordinates
//! - Strongly-typed identifiers
//! - The port error type every external adapter reports through

pub mod money;
pub mod units;
pub mod geo;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use units::{WeightUnit, DimensionUnit, UnitConverter, MIN_WEIGHT_KG, MIN_DIMENSION_M};
pub use geo::Coordinates;
pub use identifiers::{SessionId, ClaimRequestId, ProviderClaimId, OrderId};
pub use ports::{PortError, DomainPort};
