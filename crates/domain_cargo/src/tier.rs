//! Vehicle class tiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::aggregate::ShipmentAggregate;
use crate::error::CargoError;

/// Heaviest shipment the provider will carry, checked before classification
pub const MAX_TOTAL_WEIGHT_KG: f64 = 4000.0;

/// Provider vehicle classes, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CargoClass {
    #[serde(rename = "van")]
    Van,
    #[serde(rename = "lcv_m")]
    LcvM,
    #[serde(rename = "lcv_l")]
    LcvL,
    #[serde(rename = "lcv_xl")]
    LcvXl,
    #[serde(rename = "lcv_xxl")]
    LcvXxl,
}

impl CargoClass {
    pub const ALL: [CargoClass; 5] = [
        CargoClass::Van,
        CargoClass::LcvM,
        CargoClass::LcvL,
        CargoClass::LcvXl,
        CargoClass::LcvXxl,
    ];

    /// The `cargo_type` value the provider API expects
    pub fn api_name(&self) -> &'static str {
        match self {
            CargoClass::Van => "van",
            CargoClass::LcvM => "lcv_m",
            CargoClass::LcvL => "lcv_l",
            CargoClass::LcvXl => "lcv_xl",
            CargoClass::LcvXxl => "lcv_xxl",
        }
    }
}

impl fmt::Display for CargoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for CargoClass {
    type Err = CargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CargoClass::ALL
            .into_iter()
            .find(|class| class.api_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CargoError::UnknownClass(s.to_string()))
    }
}

/// Capacity limits of one vehicle class (kg and meters, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierLimits {
    pub max_weight_kg: f64,
    pub max_length_m: f64,
    pub max_width_m: f64,
    pub max_height_m: f64,
}

impl TierLimits {
    pub const fn new(max_weight_kg: f64, max_length_m: f64, max_width_m: f64, max_height_m: f64) -> Self {
        Self {
            max_weight_kg,
            max_length_m,
            max_width_m,
            max_height_m,
        }
    }

    /// True when every limit is at least the matching limit of `other`
    pub fn dominates(&self, other: &TierLimits) -> bool {
        self.max_weight_kg >= other.max_weight_kg
            && self.max_length_m >= other.max_length_m
            && self.max_width_m >= other.max_width_m
            && self.max_height_m >= other.max_height_m
    }
}

/// One row of the tier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoClassTier {
    pub class: CargoClass,
    pub limits: TierLimits,
}

impl CargoClassTier {
    /// Checks a shipment against this tier, using `total_weight_kg` in
    /// place of the aggregate's own total
    pub fn accepts(&self, aggregate: &ShipmentAggregate, total_weight_kg: f64) -> bool {
        total_weight_kg <= self.limits.max_weight_kg
            && aggregate.max_length_m <= self.limits.max_length_m
            && aggregate.max_width_m <= self.limits.max_width_m
            && aggregate.max_height_m <= self.limits.max_height_m
    }
}

/// Ordered, immutable tier table
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<CargoClassTier>,
}

impl TierTable {
    /// Builds a table, rejecting empty, unordered or non-monotonic input
    pub fn new(tiers: Vec<CargoClassTier>) -> Result<Self, CargoError> {
        if tiers.is_empty() {
            return Err(CargoError::InvalidTierTable("table is empty".to_string()));
        }

        for pair in tiers.windows(2) {
            let (smaller, larger) = (&pair[0], &pair[1]);
            if larger.class <= smaller.class {
                return Err(CargoError::InvalidTierTable(format!(
                    "{} listed after {}",
                    larger.class, smaller.class
                )));
            }
            if !larger.limits.dominates(&smaller.limits) {
                return Err(CargoError::InvalidTierTable(format!(
                    "{} limits are smaller than {}",
                    larger.class, smaller.class
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// The provider's published vehicle limits
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                CargoClassTier { class: CargoClass::Van, limits: TierLimits::new(300.0, 1.70, 1.00, 0.90) },
                CargoClassTier { class: CargoClass::LcvM, limits: TierLimits::new(700.0, 2.60, 1.30, 1.50) },
                CargoClassTier { class: CargoClass::LcvL, limits: TierLimits::new(1400.0, 3.80, 1.80, 1.80) },
                CargoClassTier { class: CargoClass::LcvXl, limits: TierLimits::new(2000.0, 4.00, 1.90, 2.00) },
                CargoClassTier { class: CargoClass::LcvXxl, limits: TierLimits::new(4000.0, 5.00, 2.00, 2.00) },
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CargoClassTier> {
        self.tiers.iter()
    }

    pub fn get(&self, class: CargoClass) -> Option<&CargoClassTier> {
        self.tiers.iter().find(|tier| tier.class == class)
    }

    /// Position of `class` in the table
    pub fn position(&self, class: CargoClass) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.class == class)
    }

    pub fn largest(&self) -> &CargoClassTier {
        // `new` and `standard` both guarantee at least one tier
        &self.tiers[self.tiers.len() - 1]
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}
