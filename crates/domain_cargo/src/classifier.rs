//! Vehicle class selection
//!
//! The classifier answers two questions: which class is the smallest one a
//! shipment fits into, and which classes are worth asking the provider
//! about. The second answer is never empty: when nothing fits, pricing is
//! still attempted once without a vehicle class requirement.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::aggregate::ShipmentAggregate;
use crate::error::CargoError;
use crate::item::PhysicalItem;
use crate::tier::{CargoClass, TierTable, MAX_TOTAL_WEIGHT_KG};

/// A class to request a price for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateClass {
    /// Ask for a specific vehicle class
    Tier(CargoClass),
    /// Ask without a vehicle class requirement
    Unclassified,
}

impl CandidateClass {
    /// `cargo_type` to send, if any
    pub fn as_api_value(&self) -> Option<&'static str> {
        match self {
            CandidateClass::Tier(class) => Some(class.api_name()),
            CandidateClass::Unclassified => None,
        }
    }

    pub fn tier(&self) -> Option<CargoClass> {
        match self {
            CandidateClass::Tier(class) => Some(*class),
            CandidateClass::Unclassified => None,
        }
    }
}

impl From<CargoClass> for CandidateClass {
    fn from(class: CargoClass) -> Self {
        CandidateClass::Tier(class)
    }
}

impl fmt::Display for CandidateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateClass::Tier(class) => write!(f, "{class}"),
            CandidateClass::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// Measured quantity checked against a tier limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitAxis {
    Weight,
    Length,
    Width,
    Height,
}

impl fmt::Display for LimitAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimitAxis::Weight => "weight",
            LimitAxis::Length => "length",
            LimitAxis::Width => "width",
            LimitAxis::Height => "height",
        };
        f.write_str(name)
    }
}

/// One exceeded limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitViolation {
    pub axis: LimitAxis,
    pub actual: f64,
    pub limit: f64,
}

/// Result of checking a shipment against a single class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionCheck {
    pub class: CargoClass,
    pub violations: Vec<LimitViolation>,
}

impl DimensionCheck {
    pub fn fits(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for DimensionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "{}: within limits", self.class);
        }
        write!(f, "{}:", self.class)?;
        for v in &self.violations {
            write!(f, " {} {:.2} > {:.2};", v.axis, v.actual, v.limit)?;
        }
        Ok(())
    }
}

/// Maps shipments onto the tier table
#[derive(Debug, Clone, Default)]
pub struct CargoClassifier {
    table: TierTable,
}

impl CargoClassifier {
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    /// Smallest class the items fit into, or `None` when nothing fits
    pub fn classify(&self, items: &[PhysicalItem]) -> Option<CargoClass> {
        let aggregate = ShipmentAggregate::from_items(items);
        let class = self.classify_aggregate(&aggregate);
        debug!(
            total_weight_kg = aggregate.total_weight_kg,
            max_length_m = aggregate.max_length_m,
            max_width_m = aggregate.max_width_m,
            max_height_m = aggregate.max_height_m,
            class = ?class,
            "Classified shipment"
        );
        class
    }

    pub fn classify_aggregate(&self, aggregate: &ShipmentAggregate) -> Option<CargoClass> {
        if aggregate.is_empty() {
            return None;
        }
        self.table
            .iter()
            .find(|tier| tier.accepts(aggregate, aggregate.total_weight_kg))
            .map(|tier| tier.class)
    }

    /// Ordered classes to request prices for
    ///
    /// With a known primary class this is the primary followed by every
    /// larger class. Without one it is every class the shipment fits into
    /// given `total_weight_kg`. Falls back to a single
    /// [`CandidateClass::Unclassified`] entry.
    pub fn candidates_from(
        &self,
        primary: Option<CargoClass>,
        items: &[PhysicalItem],
        total_weight_kg: f64,
    ) -> Vec<CandidateClass> {
        let candidates: Vec<CandidateClass> = match primary.and_then(|p| self.table.position(p)) {
            Some(start) => self
                .table
                .iter()
                .skip(start)
                .map(|tier| CandidateClass::Tier(tier.class))
                .collect(),
            None => {
                let aggregate = ShipmentAggregate::from_items(items);
                self.table
                    .iter()
                    .filter(|tier| tier.accepts(&aggregate, total_weight_kg))
                    .map(|tier| CandidateClass::Tier(tier.class))
                    .collect()
            }
        };

        if candidates.is_empty() {
            debug!(total_weight_kg, "No class fits, pricing without a vehicle class");
            return vec![CandidateClass::Unclassified];
        }
        candidates
    }

    /// Lists every limit of `class` the items exceed
    pub fn check_dimensions(&self, items: &[PhysicalItem], class: CargoClass) -> DimensionCheck {
        let aggregate = ShipmentAggregate::from_items(items);
        let mut violations = Vec::new();

        if let Some(tier) = self.table.get(class) {
            let limits = tier.limits;
            let checks = [
                (LimitAxis::Weight, aggregate.total_weight_kg, limits.max_weight_kg),
                (LimitAxis::Length, aggregate.max_length_m, limits.max_length_m),
                (LimitAxis::Width, aggregate.max_width_m, limits.max_width_m),
                (LimitAxis::Height, aggregate.max_height_m, limits.max_height_m),
            ];
            violations.extend(
                checks
                    .into_iter()
                    .filter(|(_, actual, limit)| actual > limit)
                    .map(|(axis, actual, limit)| LimitViolation { axis, actual, limit }),
            );
        }

        DimensionCheck { class, violations }
    }

    /// Rejects empty and overweight shipments before any pricing happens
    pub fn validate(&self, items: &[PhysicalItem]) -> Result<ShipmentAggregate, CargoError> {
        let aggregate = ShipmentAggregate::from_items(items);
        if aggregate.is_empty() {
            return Err(CargoError::EmptyShipment);
        }
        if aggregate.total_weight_kg > MAX_TOTAL_WEIGHT_KG {
            return Err(CargoError::Overweight {
                total_kg: aggregate.total_weight_kg,
                limit_kg: MAX_TOTAL_WEIGHT_KG,
            });
        }
        Ok(aggregate)
    }

    /// Like [`classify`](Self::classify) but reports a no-fit as an error
    pub fn require_class(&self, items: &[PhysicalItem]) -> Result<CargoClass, CargoError> {
        let aggregate = self.validate(items)?;
        self.classify_aggregate(&aggregate).ok_or(CargoError::NoFit {
            total_kg: aggregate.total_weight_kg,
            length_m: aggregate.max_length_m,
            width_m: aggregate.max_width_m,
            height_m: aggregate.max_height_m,
        })
    }
}
