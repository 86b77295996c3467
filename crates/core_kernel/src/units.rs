//! Unit normalisation for host catalogue measurements
//!
//! Store catalogues record product weight and dimensions in whatever unit
//! the merchant configured. Everything downstream (vehicle classification,
//! provider requests) works in kilograms and meters, so conversion happens
//! once at the boundary. Missing or non-positive inputs clamp to a small
//! floor instead of zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest weight ever reported for an item (100 g)
pub const MIN_WEIGHT_KG: f64 = 0.1;

/// Smallest dimension ever reported for an item (1 cm)
pub const MIN_DIMENSION_M: f64 = 0.01;

const LBS_TO_KG: f64 = 0.453592;
const OZ_TO_KG: f64 = 0.0283495;
const IN_TO_M: f64 = 0.0254;
const YD_TO_M: f64 = 0.9144;

/// Weight unit configured by the host store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    #[default]
    Kg,
    Lbs,
    Oz,
}

impl WeightUnit {
    /// Parses a host unit string; unrecognised units are treated as kilograms
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "g" => WeightUnit::G,
            "lbs" => WeightUnit::Lbs,
            "oz" => WeightUnit::Oz,
            _ => WeightUnit::Kg,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeightUnit::G => "g",
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
            WeightUnit::Oz => "oz",
        };
        f.write_str(s)
    }
}

/// Dimension unit configured by the host store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Mm,
    #[default]
    Cm,
    M,
    In,
    Yd,
}

impl DimensionUnit {
    /// Parses a host unit string; unrecognised units are treated as centimeters
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mm" => DimensionUnit::Mm,
            "m" => DimensionUnit::M,
            "in" => DimensionUnit::In,
            "yd" => DimensionUnit::Yd,
            _ => DimensionUnit::Cm,
        }
    }
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DimensionUnit::Mm => "mm",
            DimensionUnit::Cm => "cm",
            DimensionUnit::M => "m",
            DimensionUnit::In => "in",
            DimensionUnit::Yd => "yd",
        };
        f.write_str(s)
    }
}

/// Converts host measurements into kilograms and meters
///
/// Pure functions with no failure modes.
pub struct UnitConverter;

impl UnitConverter {
    /// Converts a weight into kilograms
    ///
    /// `None`, zero, negative and non-finite inputs yield [`MIN_WEIGHT_KG`].
    pub fn to_kg(value: Option<f64>, unit: WeightUnit) -> f64 {
        let value = match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => return MIN_WEIGHT_KG,
        };

        match unit {
            WeightUnit::G => value / 1000.0,
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * LBS_TO_KG,
            WeightUnit::Oz => value * OZ_TO_KG,
        }
    }

    /// Converts a length into meters
    ///
    /// `None`, zero, negative and non-finite inputs yield [`MIN_DIMENSION_M`].
    pub fn to_meters(value: Option<f64>, unit: DimensionUnit) -> f64 {
        let value = match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => return MIN_DIMENSION_M,
        };

        match unit {
            DimensionUnit::Mm => value / 1000.0,
            DimensionUnit::Cm => value / 100.0,
            DimensionUnit::M => value,
            DimensionUnit::In => value * IN_TO_M,
            DimensionUnit::Yd => value * YD_TO_M,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_weight_conversions() {
        assert_eq!(UnitConverter::to_kg(Some(500.0), WeightUnit::G), 0.5);
        assert_eq!(UnitConverter::to_kg(Some(2.0), WeightUnit::Kg), 2.0);
        assert_eq!(UnitConverter::to_kg(Some(1.0), WeightUnit::Lbs), 0.453592);
        assert_eq!(UnitConverter::to_kg(Some(1.0), WeightUnit::Oz), 0.0283495);
    }

    #[test]
    fn test_known_dimension_conversions() {
        assert_eq!(UnitConverter::to_meters(Some(2.0), DimensionUnit::In), 0.0508);
        assert_eq!(UnitConverter::to_meters(Some(40.0), DimensionUnit::Cm), 0.4);
        assert_eq!(UnitConverter::to_meters(Some(250.0), DimensionUnit::Mm), 0.25);
        assert_eq!(UnitConverter::to_meters(Some(1.5), DimensionUnit::M), 1.5);
        assert_eq!(UnitConverter::to_meters(Some(1.0), DimensionUnit::Yd), 0.9144);
    }

    #[test]
    fn test_floors() {
        assert_eq!(UnitConverter::to_kg(None, WeightUnit::Kg), MIN_WEIGHT_KG);
        assert_eq!(UnitConverter::to_kg(Some(0.0), WeightUnit::G), MIN_WEIGHT_KG);
        assert_eq!(UnitConverter::to_kg(Some(-3.0), WeightUnit::Lbs), MIN_WEIGHT_KG);
        assert_eq!(UnitConverter::to_kg(Some(f64::NAN), WeightUnit::Kg), MIN_WEIGHT_KG);
        assert_eq!(UnitConverter::to_meters(None, DimensionUnit::Cm), MIN_DIMENSION_M);
        assert_eq!(UnitConverter::to_meters(Some(0.0), DimensionUnit::M), MIN_DIMENSION_M);
    }

    #[test]
    fn test_unknown_units_fall_back() {
        assert_eq!(WeightUnit::parse("stone"), WeightUnit::Kg);
        assert_eq!(DimensionUnit::parse("furlong"), DimensionUnit::Cm);
        assert_eq!(WeightUnit::parse(" LBS "), WeightUnit::Lbs);
        assert_eq!(DimensionUnit::parse("MM"), DimensionUnit::Mm);
    }
}
