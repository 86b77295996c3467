//! Cargo domain errors

use thiserror::Error;

/// Errors that can occur while preparing a shipment for quoting
#[derive(Debug, Error, PartialEq)]
pub enum CargoError {
    #[error("Shipment has no items")]
    EmptyShipment,

    #[error("Shipment weighs {total_kg:.2} kg, over the {limit_kg} kg limit")]
    Overweight { total_kg: f64, limit_kg: f64 },

    #[error("Shipment fits no vehicle class (total {total_kg:.2} kg, largest item {length_m:.2} x {width_m:.2} x {height_m:.2} m)")]
    NoFit {
        total_kg: f64,
        length_m: f64,
        width_m: f64,
        height_m: f64,
    },

    #[error("Invalid tier table: {0}")]
    InvalidTierTable(String),

    #[error("Unknown cargo class: {0}")]
    UnknownClass(String),
}
