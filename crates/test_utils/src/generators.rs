//! Property-Based Test Generators
//!
//! Proptest strategies for host measurements and metric items that keep
//! to known positions in the vehicle class table.

use core_kernel::{DimensionUnit, WeightUnit};
use domain_cargo::{PhysicalItem, RawMeasurements};
use proptest::prelude::*;

/// Strategy for host weight units
pub fn weight_unit_strategy() -> impl Strategy<Value = WeightUnit> {
    prop_oneof![
        Just(WeightUnit::G),
        Just(WeightUnit::Kg),
        Just(WeightUnit::Lbs),
        Just(WeightUnit::Oz),
    ]
}

/// Strategy for host dimension units
pub fn dimension_unit_strategy() -> impl Strategy<Value = DimensionUnit> {
    prop_oneof![
        Just(DimensionUnit::Mm),
        Just(DimensionUnit::Cm),
        Just(DimensionUnit::M),
        Just(DimensionUnit::In),
        Just(DimensionUnit::Yd),
    ]
}

/// Strategy for raw catalogue values, including missing and zero ones
pub fn raw_measurements_strategy() -> impl Strategy<Value = RawMeasurements> {
    let value = prop_oneof![Just(None), Just(Some(0.0)), (0.0f64..500.0).prop_map(Some)];
    (value.clone(), value.clone(), value.clone(), value).prop_map(|(weight, length, width, height)| {
        RawMeasurements {
            weight,
            length,
            width,
            height,
        }
    })
}

/// Strategy for items that fit the smallest class on their own
///
/// Ten of them together still stay under the smallest weight limit.
pub fn van_item_strategy() -> impl Strategy<Value = PhysicalItem> {
    (0.1f64..30.0, 0.01f64..1.7, 0.01f64..1.0, 0.01f64..0.9, 1u32..5)
        .prop_map(|(w, l, wd, h, q)| PhysicalItem::new(w, l, wd, h, q))
}

/// Strategy for items of any size up to the largest class limits
pub fn any_item_strategy() -> impl Strategy<Value = PhysicalItem> {
    (0.1f64..800.0, 0.01f64..5.0, 0.01f64..2.0, 0.01f64..2.0, 1u32..10)
        .prop_map(|(w, l, wd, h, q)| PhysicalItem::new(w, l, wd, h, q))
}

/// Strategy for items longer than every class allows
pub fn oversized_item_strategy() -> impl Strategy<Value = PhysicalItem> {
    (0.1f64..100.0, 5.01f64..12.0, 0.01f64..2.0, 0.01f64..2.0)
        .prop_map(|(w, l, wd, h)| PhysicalItem::new(w, l, wd, h, 1))
}
