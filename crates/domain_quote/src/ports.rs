//! Pricing port
//!
//! [`PricingPort`] is the seam between negotiation and the provider's
//! offer calculation endpoint. Requests are built here in domain terms; the
//! HTTP adapter in `infra_yandex` maps them onto the wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{Coordinates, DomainPort, Money, PortError};
use domain_cargo::{CandidateClass, CargoClass, PhysicalItem};

use crate::offer::OfferPayload;

/// Route point id of the warehouse
pub const PICKUP_POINT_ID: u8 = 1;
/// Route point id of the customer
pub const DROPOFF_POINT_ID: u8 = 2;

/// A located endpoint of the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coordinates: Coordinates,
    pub fullname: String,
}

impl Waypoint {
    pub fn new(coordinates: Coordinates, fullname: impl Into<String>) -> Self {
        Self {
            coordinates,
            fullname: fullname.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub id: u8,
    pub coordinates: Coordinates,
    pub fullname: String,
}

/// One item line as priced by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingItem {
    pub quantity: u32,
    pub weight_kg: f64,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub pickup_point: u8,
    pub dropoff_point: u8,
}

impl From<&PhysicalItem> for PricingItem {
    fn from(item: &PhysicalItem) -> Self {
        Self {
            quantity: item.quantity,
            weight_kg: item.weight_kg,
            length_m: item.length_m,
            width_m: item.width_m,
            height_m: item.height_m,
            pickup_point: PICKUP_POINT_ID,
            dropoff_point: DROPOFF_POINT_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequirements {
    pub taxi_classes: Vec<String>,
    /// Absent when pricing without a vehicle class
    pub cargo_type: Option<CargoClass>,
    pub cargo_loaders: u32,
    pub skip_door_to_door: bool,
}

impl PricingRequirements {
    pub fn for_candidate(candidate: CandidateClass) -> Self {
        Self {
            taxi_classes: vec!["cargo".to_string()],
            cargo_type: candidate.tier(),
            cargo_loaders: 0,
            skip_door_to_door: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub route_points: Vec<RoutePoint>,
    pub items: Vec<PricingItem>,
    pub requirements: PricingRequirements,
}

impl PricingRequest {
    /// Builds the request for one candidate class
    pub fn build(
        items: &[PhysicalItem],
        origin: &Waypoint,
        destination: &Waypoint,
        candidate: CandidateClass,
    ) -> Self {
        Self {
            route_points: vec![
                RoutePoint {
                    id: PICKUP_POINT_ID,
                    coordinates: origin.coordinates,
                    fullname: origin.fullname.clone(),
                },
                RoutePoint {
                    id: DROPOFF_POINT_ID,
                    coordinates: destination.coordinates,
                    fullname: destination.fullname.clone(),
                },
            ],
            items: items.iter().map(PricingItem::from).collect(),
            requirements: PricingRequirements::for_candidate(candidate),
        }
    }

    pub fn candidate(&self) -> CandidateClass {
        match self.requirements.cargo_type {
            Some(class) => CandidateClass::Tier(class),
            None => CandidateClass::Unclassified,
        }
    }
}

/// One offer as returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct QuotedOffer {
    /// `None` when the provider's total price was missing or not numeric
    pub total_price: Option<Money>,
    pub payload: Option<OfferPayload>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingResponse {
    pub offers: Vec<QuotedOffer>,
}

#[async_trait]
pub trait PricingPort: DomainPort {
    /// Requests offers for one class
    ///
    /// Non-success statuses and error payloads come back as
    /// [`PortError::Provider`]; an empty offer list is a normal response.
    async fn calculate(&self, request: &PricingRequest) -> Result<PricingResponse, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone)]
    enum Script {
        Offers(Vec<QuotedOffer>),
        Status(u16),
        Timeout,
    }

    /// In-memory pricing endpoint scripted per candidate class
    ///
    /// Classes without a script answer with an empty offer list.
    #[derive(Debug, Default)]
    pub struct MockPricingPort {
        scripts: HashMap<CandidateClass, Script>,
        requests: Arc<RwLock<Vec<PricingRequest>>>,
    }

    impl MockPricingPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answers `class` with one offer per `(price, payload)` pair, priced in RUB
        pub fn with_offers(mut self, class: CandidateClass, offers: Vec<(Decimal, Option<&str>)>) -> Self {
            let offers = offers
                .into_iter()
                .map(|(price, payload)| QuotedOffer {
                    total_price: Some(Money::new(price, core_kernel::Currency::RUB)),
                    payload: payload.map(OfferPayload::from),
                })
                .collect();
            self.scripts.insert(class, Script::Offers(offers));
            self
        }

        /// Answers `class` with raw offers, including ones without a price
        pub fn with_quoted(mut self, class: CandidateClass, offers: Vec<QuotedOffer>) -> Self {
            self.scripts.insert(class, Script::Offers(offers));
            self
        }

        /// Answers `class` with a non-success HTTP status
        pub fn with_status(mut self, class: CandidateClass, status: u16) -> Self {
            self.scripts.insert(class, Script::Status(status));
            self
        }

        /// Times out for `class`
        pub fn with_timeout(mut self, class: CandidateClass) -> Self {
            self.scripts.insert(class, Script::Timeout);
            self
        }

        /// Every request received, in order
        pub async fn requests(&self) -> Vec<PricingRequest> {
            self.requests.read().await.clone()
        }

        /// Candidate classes requested, in order
        pub async fn requested_classes(&self) -> Vec<CandidateClass> {
            self.requests.read().await.iter().map(PricingRequest::candidate).collect()
        }
    }

    impl DomainPort for MockPricingPort {}

    #[async_trait]
    impl PricingPort for MockPricingPort {
        async fn calculate(&self, request: &PricingRequest) -> Result<PricingResponse, PortError> {
            self.requests.write().await.push(request.clone());
            match self.scripts.get(&request.candidate()) {
                Some(Script::Offers(offers)) => Ok(PricingResponse { offers: offers.clone() }),
                Some(Script::Status(status)) => Err(PortError::provider(
                    Some(*status),
                    None,
                    format!("mock status {status}"),
                )),
                Some(Script::Timeout) => Err(PortError::Timeout {
                    operation: "offers/calculate".to_string(),
                    duration_ms: 25_000,
                }),
                None => Ok(PricingResponse::default()),
            }
        }
    }
}
