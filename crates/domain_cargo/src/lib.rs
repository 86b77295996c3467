//! Cargo Domain
//!
//! This crate turns host catalogue lines into metric physical items and
//! maps a shipment onto the provider's vehicle classes.
//!
//! # Vehicle classes
//!
//! ```text
//! van -> lcv_m -> lcv_l -> lcv_xl -> lcv_xxl
//! ```
//!
//! A shipment needs the first class whose weight limit covers the total
//! weight and whose length/width/height limits cover the largest item on
//! each axis. Negotiation may later retry with larger classes.

pub mod item;
pub mod aggregate;
pub mod tier;
pub mod classifier;
pub mod error;

pub use item::{PhysicalItem, RawMeasurements};
pub use aggregate::ShipmentAggregate;
pub use tier::{CargoClass, CargoClassTier, TierLimits, TierTable, MAX_TOTAL_WEIGHT_KG};
pub use classifier::{CargoClassifier, CandidateClass, DimensionCheck, LimitAxis, LimitViolation};
pub use error::CargoError;
