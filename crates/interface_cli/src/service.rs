//! Shipping workflows
//!
//! [`ShippingService`] wires the domain services to their ports and runs
//! the two host-facing workflows: quoting at checkout and booking a claim
//! for a placed order.
//!
//! # Quote
//!
//! ```text
//! settings -> destination -> coordinates -> items -> class -> candidates
//!          -> cheapest offer -> rate (+ session when the offer has a payload)
//! ```
//!
//! # Booking
//!
//! ```text
//! settings -> destination (shipping, else billing) -> coordinates -> items
//!          -> class -> payload (order, shipping line, session) -> claim
//! ```
//!
//! A booking that fails before anything reaches the provider leaves an
//! `Error: ...` note on the order. Once submission starts the outcome note
//! is written by [`ClaimSubmitter`].

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{Coordinates, OrderId, ProviderClaimId, SessionId};
use domain_cargo::{CargoClass, CargoClassifier, PhysicalItem};
use domain_claims::{build_claim_request, ClaimOutcome, ClaimPort, ClaimRequest, ClaimSubmitter, OrderRecordPort, Sender};
use domain_geo::{Address, AddressFields, Geocoder, GeocodingPort};
use domain_quote::{
    OfferPayload, PricingPort, QuoteNegotiator, QuoteSession, QuoteSessionStore, SessionDestination, ShippingRate,
    Waypoint,
};
use serde::Serialize;

use crate::config::ShippingSettings;
use crate::error::ShippingError;
use crate::host::{Cart, CartLine, HostUnits, OrderSnapshot};

/// External collaborators of the workflows
pub struct ShippingPorts {
    pub pricing: Arc<dyn PricingPort>,
    pub claims: Arc<dyn ClaimPort>,
    pub geocoding: Arc<dyn GeocodingPort>,
    pub records: Arc<dyn OrderRecordPort>,
    pub sessions: Arc<dyn QuoteSessionStore>,
}

/// Result of an admin-triggered booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeliveryReport {
    Created { claim_id: ProviderClaimId },
    /// This attempt produced no new claim but one is already recorded
    AlreadyExists { claim_id: ProviderClaimId },
    NotCreated,
}

impl DeliveryReport {
    pub fn message(&self) -> String {
        match self {
            DeliveryReport::Created { claim_id } => format!("Claim created. Claim ID: {claim_id}"),
            DeliveryReport::AlreadyExists { claim_id } => format!("Claim already exists. Claim ID: {claim_id}"),
            DeliveryReport::NotCreated => {
                "Could not create the claim. See the order notes and logs for details.".to_string()
            }
        }
    }
}

pub struct ShippingService {
    settings: ShippingSettings,
    classifier: CargoClassifier,
    geocoder: Geocoder,
    negotiator: QuoteNegotiator,
    submitter: ClaimSubmitter,
    records: Arc<dyn OrderRecordPort>,
    sessions: Arc<dyn QuoteSessionStore>,
}

impl ShippingService {
    pub fn new(settings: ShippingSettings, ports: ShippingPorts) -> Self {
        let classifier = CargoClassifier::default();
        let geocoder = Geocoder::new(ports.geocoding, settings.maps_api_key.clone());
        Self {
            negotiator: QuoteNegotiator::new(ports.pricing).with_classifier(classifier.clone()),
            classifier,
            geocoder,
            submitter: ClaimSubmitter::new(ports.claims, ports.records.clone()),
            records: ports.records,
            sessions: ports.sessions,
            settings,
        }
    }

    pub fn settings(&self) -> &ShippingSettings {
        &self.settings
    }

    /// Prices the cart for checkout
    #[instrument(skip(self, cart), fields(session_id = %session_id, lines = cart.lines.len()))]
    pub async fn quote(&self, cart: &Cart, session_id: &SessionId) -> Result<ShippingRate, ShippingError> {
        self.settings.ensure_ready()?;

        let address = Address::compose(&cart.destination)?;
        let coordinates = self.locate(&address, &cart.destination).await?;

        let items = self.physical_items(&cart.lines, cart.units);
        let aggregate = self.classifier.validate(&items)?;
        let primary = self.classifier.classify_aggregate(&aggregate);
        let candidates = self
            .classifier
            .candidates_from(primary, &items, aggregate.total_weight_kg);
        info!(
            total_weight_kg = aggregate.total_weight_kg,
            primary = ?primary,
            candidates = ?candidates,
            "Shipment classified"
        );

        let origin = self.warehouse();
        let destination = Waypoint::new(coordinates, address.free_text());
        let offer = self
            .negotiator
            .negotiate(&items, &origin, &destination, &candidates, primary)
            .await?;

        if offer.price.currency() != self.settings.currency {
            warn!(
                offer_currency = %offer.price.currency().code(),
                store_currency = %self.settings.currency.code(),
                "Offer currency differs from the store currency"
            );
        }

        let rate = ShippingRate::from_offer(&offer, self.settings.rate_title.clone(), self.settings.base_markup);

        if offer.payload.is_some() {
            match self.sessions.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "Expired quote sessions removed"),
                Err(err) => warn!(error = %err, "Failed to purge quote sessions"),
            }
            let session = QuoteSession::new(
                session_id.clone(),
                offer.payload.clone(),
                SessionDestination {
                    coordinates,
                    address: address.free_text().to_string(),
                },
                offer.cargo_class,
            );
            if let Err(err) = self.sessions.save(session).await {
                warn!(error = %err, "Failed to store quote session");
            }
        }

        info!(cost = %rate.cost, cargo_type = %offer.cargo_class, "Rate calculated");
        Ok(rate)
    }

    /// Books a claim for `order`
    ///
    /// Errors are returned only for failures before submission; each one is
    /// also written to the order as a note.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn create_delivery(&self, order: &OrderSnapshot) -> Result<ClaimOutcome, ShippingError> {
        let request = match self.prepare_claim(order).await {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Delivery not created");
                self.note(order.order_id, &format!("Error: {err}")).await;
                return Err(err);
            }
        };

        let outcome = self.submitter.submit(order.order_id, &request).await;

        if outcome.is_created() {
            if let Some(session_id) = &order.session_id {
                if let Err(err) = self.sessions.take(session_id).await {
                    debug!(error = %err, "Failed to release quote session");
                }
            }
        }
        Ok(outcome)
    }

    /// Books a claim when automatic booking is on and the order ships with
    /// the cargo method
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn auto_create_delivery(&self, order: &OrderSnapshot) -> Result<Option<ClaimOutcome>, ShippingError> {
        if !self.settings.auto_create_delivery {
            debug!("Automatic booking disabled");
            return Ok(None);
        }
        if !order.has_cargo_shipping() {
            let methods: Vec<&str> = order.shipping_lines.iter().map(|l| l.method_id.as_str()).collect();
            debug!(methods = ?methods, "Order does not ship with the cargo method");
            return Ok(None);
        }

        info!("Starting automatic booking");
        self.create_delivery(order).await.map(Some)
    }

    /// Admin-triggered booking, reported by comparing recorded claim ids
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn manual_create_delivery(&self, order: &OrderSnapshot) -> DeliveryReport {
        let before = self.recorded_claim(order.order_id).await;

        if let Err(err) = self.create_delivery(order).await {
            debug!(error = %err, "Manual booking stopped before submission");
        }

        let after = self.recorded_claim(order.order_id).await;
        match (before, after) {
            (before, Some(after)) if before.as_ref() != Some(&after) => DeliveryReport::Created { claim_id: after },
            (_, Some(after)) => DeliveryReport::AlreadyExists { claim_id: after },
            (_, None) => DeliveryReport::NotCreated,
        }
    }

    async fn prepare_claim(&self, order: &OrderSnapshot) -> Result<ClaimRequest, ShippingError> {
        self.settings.ensure_ready()?;

        let fields = order.destination_fields();
        let address = Address::compose(&fields)?;

        let session = match &order.session_id {
            Some(session_id) => self.sessions.get(session_id).await.unwrap_or_else(|err| {
                warn!(error = %err, "Failed to read quote session");
                None
            }),
            None => None,
        };

        let coordinates = match session
            .as_ref()
            .filter(|s| s.destination.address == address.free_text())
        {
            Some(session) => {
                debug!("Reusing coordinates from the quote session");
                session.destination.coordinates
            }
            None => self.locate(&address, &fields).await?,
        };

        let units = order.units.unwrap_or_else(|| self.host_units());
        let items = self.physical_items(&order.lines, Some(units));
        let cargo_class = self.booking_class(&items, session.as_ref())?;

        let payload = resolve_payload(order, session.as_ref());
        info!(
            cargo_type = %cargo_class,
            has_payload = payload.is_some(),
            "Booking prepared"
        );

        let sender = Sender {
            waypoint: self.warehouse(),
            contact_name: self.settings.sender_name.clone(),
            contact_phone: self.settings.sender_phone.clone(),
        };
        let lines: Vec<_> = order.lines.iter().map(|line| line.claim_line(units)).collect();
        let destination = Waypoint::new(coordinates, address.free_text());

        Ok(build_claim_request(
            &order.claim_order(),
            &lines,
            &sender,
            &destination,
            cargo_class,
            payload,
        ))
    }

    /// The class quoted at checkout when known, otherwise the smallest
    /// class the items fit
    fn booking_class(&self, items: &[PhysicalItem], session: Option<&QuoteSession>) -> Result<CargoClass, ShippingError> {
        let aggregate = self.classifier.validate(items)?;
        if let Some(class) = session.and_then(|s| s.cargo_class.tier()) {
            if self.classifier.check_dimensions(items, class).fits() {
                return Ok(class);
            }
            warn!(cargo_type = %class, "Quoted class no longer fits the order");
        }
        debug!(total_weight_kg = aggregate.total_weight_kg, "Classifying order items");
        Ok(self.classifier.require_class(items)?)
    }

    async fn locate(&self, address: &Address, fields: &AddressFields) -> Result<Coordinates, ShippingError> {
        let hints = fields.hints();
        match self.geocoder.resolve(address.free_text(), &hints).await {
            Some(resolution) => {
                if resolution.is_approximate() {
                    warn!(address = %address.free_text(), "Using approximate destination coordinates");
                }
                Ok(resolution.coordinates)
            }
            None => Err(ShippingError::GeocodeMiss {
                address: address.free_text().to_string(),
            }),
        }
    }

    fn physical_items(&self, lines: &[CartLine], units: Option<HostUnits>) -> Vec<PhysicalItem> {
        let units = units.unwrap_or_else(|| self.host_units());
        lines.iter().map(|line| line.physical_item(units)).collect()
    }

    fn host_units(&self) -> HostUnits {
        HostUnits {
            weight: self.settings.weight_unit,
            dimension: self.settings.dimension_unit,
        }
    }

    fn warehouse(&self) -> Waypoint {
        Waypoint::new(self.settings.warehouse(), self.settings.warehouse_address.clone())
    }

    async fn recorded_claim(&self, order_id: OrderId) -> Option<ProviderClaimId> {
        match self.records.claim_id(order_id).await {
            Ok(id) => id.filter(|id| !id.is_blank()),
            Err(err) => {
                warn!(error = %err, "Failed to read recorded claim id");
                None
            }
        }
    }

    async fn note(&self, order_id: OrderId, note: &str) {
        if let Err(err) = self.records.add_note(order_id, note).await {
            warn!(error = %err, "Failed to add order note");
        }
    }
}

/// Payload lookup order: the order itself, its shipping lines, then the
/// checkout session
fn resolve_payload(order: &OrderSnapshot, session: Option<&QuoteSession>) -> Option<OfferPayload> {
    let (payload, source) = if let Some(payload) = order.meta_payload.as_ref().filter(|p| !p.is_empty()) {
        (Some(payload.clone()), "order_meta")
    } else if let Some(payload) = order.shipping_line_payload() {
        (Some(payload.clone()), "shipping_line")
    } else if let Some(payload) = session.and_then(|s| s.payload.clone()) {
        (Some(payload), "quote_session")
    } else {
        (None, "none")
    };
    debug!(source, "Offer payload resolved");
    payload
}
