//! Shipment aggregate

use serde::{Deserialize, Serialize};

use crate::item::PhysicalItem;

/// Derived totals of an item set
///
/// Built from the items every time it is needed; never updated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentAggregate {
    pub total_weight_kg: f64,
    pub max_length_m: f64,
    pub max_width_m: f64,
    pub max_height_m: f64,
    pub total_volume_m3: f64,
    pub item_count: usize,
}

impl ShipmentAggregate {
    pub fn from_items(items: &[PhysicalItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_weight_kg: acc.total_weight_kg + item.weight_kg,
            max_length_m: acc.max_length_m.max(item.length_m),
            max_width_m: acc.max_width_m.max(item.width_m),
            max_height_m: acc.max_height_m.max(item.height_m),
            total_volume_m3: acc.total_volume_m3 + item.unit_volume_m3() * f64::from(item.quantity),
            item_count: acc.item_count + 1,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}
