//! Offer negotiation
//!
//! Candidate classes are priced one at a time, smallest first. Every offer
//! with a price competes; the cheapest wins and ties keep the offer seen
//! first. A failing class is logged and skipped. Once the primary class has
//! produced an offer the larger classes are not asked.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use domain_cargo::{CandidateClass, CargoClass, CargoClassifier, PhysicalItem, ShipmentAggregate};

use crate::error::QuoteError;
use crate::offer::Offer;
use crate::ports::{PricingPort, PricingRequest, Waypoint};

pub struct QuoteNegotiator {
    port: Arc<dyn PricingPort>,
    classifier: CargoClassifier,
}

impl QuoteNegotiator {
    pub fn new(port: Arc<dyn PricingPort>) -> Self {
        Self {
            port,
            classifier: CargoClassifier::default(),
        }
    }

    /// Uses `classifier` for the no-offer diagnostics
    pub fn with_classifier(mut self, classifier: CargoClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Finds the cheapest offer across `candidates`
    #[instrument(skip_all, fields(candidates = candidates.len(), primary = ?primary))]
    pub async fn negotiate(
        &self,
        items: &[PhysicalItem],
        origin: &Waypoint,
        destination: &Waypoint,
        candidates: &[CandidateClass],
        primary: Option<CargoClass>,
    ) -> Result<Offer, QuoteError> {
        if candidates.is_empty() {
            return Err(QuoteError::NoCandidates);
        }

        let primary = primary.map(CandidateClass::Tier);
        let mut best: Option<Offer> = None;
        let mut tried = Vec::with_capacity(candidates.len());

        for &candidate in candidates {
            tried.push(candidate);
            let request = PricingRequest::build(items, origin, destination, candidate);
            info!(cargo_type = %candidate, items = request.items.len(), "Requesting offers");

            let response = match self.port.calculate(&request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(
                        cargo_type = %candidate,
                        error = %err,
                        transient = err.is_transient(),
                        "Pricing attempt failed, trying next class"
                    );
                    continue;
                }
            };

            if response.offers.is_empty() {
                match candidate.tier() {
                    Some(class) => {
                        let check = self.classifier.check_dimensions(items, class);
                        warn!(cargo_type = %candidate, check = %check, "No offers for class");
                    }
                    None => warn!(cargo_type = %candidate, "No offers without a class requirement"),
                }
                continue;
            }

            debug!(cargo_type = %candidate, offers = response.offers.len(), "Processing offers");
            for quoted in response.offers {
                let Some(price) = quoted.total_price else {
                    debug!(cargo_type = %candidate, "Skipping offer without a numeric price");
                    continue;
                };

                let cheaper = best
                    .as_ref()
                    .map_or(true, |current| price.amount() < current.price.amount());
                if cheaper {
                    info!(
                        cargo_type = %candidate,
                        old_price = ?best.as_ref().map(|o| o.price.amount()),
                        new_price = %price.amount(),
                        has_payload = quoted.payload.is_some(),
                        "Best offer updated"
                    );
                    best = Some(Offer {
                        cargo_class: candidate,
                        price,
                        payload: quoted.payload,
                    });
                }
            }

            if best.is_some() && Some(candidate) == primary {
                info!(cargo_type = %candidate, "Primary class returned offers, stopping search");
                break;
            }
        }

        match best {
            Some(offer) => {
                info!(cargo_type = %offer.cargo_class, price = %offer.price, "Negotiation succeeded");
                Ok(offer)
            }
            None => {
                let aggregate = ShipmentAggregate::from_items(items);
                error!(
                    tried = ?tried,
                    total_weight_kg = aggregate.total_weight_kg,
                    items = items.len(),
                    route_distance_approx_km = origin.coordinates.distance_km(&destination.coordinates),
                    "No valid offers for any cargo class"
                );
                Err(QuoteError::Unavailable { tried })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockPricingPort;
    use core_kernel::Coordinates;
    use rust_decimal_macros::dec;

    fn route() -> (Waypoint, Waypoint) {
        (
            Waypoint::new(Coordinates::new(37.62, 55.75), "Москва, склад"),
            Waypoint::new(Coordinates::new(37.59, 55.73), "Москва, Арбат, 1"),
        )
    }

    fn items() -> Vec<PhysicalItem> {
        vec![PhysicalItem::new(2.0, 0.4, 0.3, 0.2, 1)]
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let negotiator = QuoteNegotiator::new(Arc::new(MockPricingPort::new()));
        let (origin, destination) = route();
        let result = negotiator.negotiate(&items(), &origin, &destination, &[], None).await;
        assert_eq!(result, Err(QuoteError::NoCandidates));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let van = CandidateClass::Tier(CargoClass::Van);
        let port = Arc::new(MockPricingPort::new().with_offers(van, vec![(dec!(900), None)]));
        let negotiator = QuoteNegotiator::new(port.clone());
        let (origin, destination) = route();

        negotiator
            .negotiate(&items(), &origin, &destination, &[van], Some(CargoClass::Van))
            .await
            .unwrap();

        let requests = port.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.route_points[0].id, 1);
        assert_eq!(request.route_points[1].id, 2);
        assert_eq!(request.route_points[1].fullname, "Москва, Арбат, 1");
        assert_eq!(request.requirements.taxi_classes, vec!["cargo".to_string()]);
        assert_eq!(request.requirements.cargo_type, Some(CargoClass::Van));
        assert_eq!(request.requirements.cargo_loaders, 0);
        assert!(!request.requirements.skip_door_to_door);
        assert_eq!(request.items[0].pickup_point, 1);
        assert_eq!(request.items[0].dropoff_point, 2);
    }
}
