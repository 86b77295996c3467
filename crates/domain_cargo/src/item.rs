//! Physical items

use serde::{Deserialize, Serialize};

use core_kernel::{DimensionUnit, UnitConverter, WeightUnit, MIN_DIMENSION_M, MIN_WEIGHT_KG};

/// Raw catalogue measurements in the host's configured units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurements {
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// One shipment line in metric units
///
/// `weight_kg` is the weight of the whole line (unit weight times
/// quantity). The dimensions are those of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalItem {
    pub weight_kg: f64,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub quantity: u32,
}

impl PhysicalItem {
    /// Creates an item from metric values, applying the minimum floors
    pub fn new(weight_kg: f64, length_m: f64, width_m: f64, height_m: f64, quantity: u32) -> Self {
        Self {
            weight_kg: floor(weight_kg, MIN_WEIGHT_KG),
            length_m: floor(length_m, MIN_DIMENSION_M),
            width_m: floor(width_m, MIN_DIMENSION_M),
            height_m: floor(height_m, MIN_DIMENSION_M),
            quantity: quantity.max(1),
        }
    }

    /// Normalises a host catalogue line
    ///
    /// Quantities below one are treated as one.
    pub fn from_measurements(
        raw: RawMeasurements,
        quantity: i64,
        weight_unit: WeightUnit,
        dimension_unit: DimensionUnit,
    ) -> Self {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        let unit_weight = UnitConverter::to_kg(raw.weight, weight_unit);

        Self::new(
            unit_weight * f64::from(quantity),
            UnitConverter::to_meters(raw.length, dimension_unit),
            UnitConverter::to_meters(raw.width, dimension_unit),
            UnitConverter::to_meters(raw.height, dimension_unit),
            quantity,
        )
    }

    /// Volume of one unit in cubic meters
    pub fn unit_volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.height_m
    }
}

fn floor(value: f64, min: f64) -> f64 {
    if value.is_finite() && value > min {
        value
    } else {
        min
    }
}
