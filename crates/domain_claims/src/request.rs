//! Claim requests
//!
//! A claim carries its own item list (with titles and declared values),
//! two route points with contacts and the vehicle class. The offer payload
//! from checkout is attached when there is one so the booked price matches
//! the quote.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimRequestId, Coordinates, Currency, Money, OrderId};
use domain_cargo::{CargoClass, PhysicalItem};
use domain_quote::ports::{DROPOFF_POINT_ID, PICKUP_POINT_ID};
use domain_quote::{OfferPayload, Waypoint};

/// Currency declared for item values
pub const DECLARED_CURRENCY: Currency = Currency::RUB;

/// Order details the claim needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimOrder {
    pub order_id: OrderId,
    /// Number shown to the customer, used in the claim comment
    pub order_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
}

/// An order line ready for booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimLine {
    pub product_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub item: PhysicalItem,
}

/// Warehouse endpoint and the sender contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub waypoint: Waypoint,
    pub contact_name: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimItem {
    pub extra_id: String,
    pub pickup_point: u8,
    pub dropoff_point: u8,
    pub title: String,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub weight_kg: f64,
    pub cost_value: Money,
    pub quantity: u32,
    pub age_restricted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Source,
    Destination,
}

impl PointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Source => "source",
            PointType::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRoutePoint {
    pub point_id: u8,
    pub visit_order: u8,
    pub point_type: PointType,
    pub contact: Contact,
    pub fullname: String,
    pub coordinates: Coordinates,
    pub external_order_id: Option<String>,
    pub skip_confirmation: bool,
    pub leave_under_door: bool,
    pub meet_outside: bool,
    pub no_door_call: bool,
}

impl ClaimRoutePoint {
    fn new(point_id: u8, point_type: PointType, contact: Contact, waypoint: &Waypoint) -> Self {
        Self {
            point_id,
            visit_order: point_id,
            point_type,
            contact,
            fullname: waypoint.fullname.clone(),
            coordinates: waypoint.coordinates,
            external_order_id: None,
            skip_confirmation: true,
            leave_under_door: false,
            meet_outside: false,
            no_door_call: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequirements {
    pub taxi_class: String,
    pub cargo_type: CargoClass,
    pub cargo_loaders: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub request_id: ClaimRequestId,
    pub items: Vec<ClaimItem>,
    pub route_points: Vec<ClaimRoutePoint>,
    pub client_requirements: ClientRequirements,
    pub skip_client_notify: bool,
    pub comment: String,
    pub offer_payload: Option<OfferPayload>,
}

/// Builds the creation request for one booking attempt
///
/// Every call mints a fresh request id.
pub fn build_claim_request(
    order: &ClaimOrder,
    lines: &[ClaimLine],
    sender: &Sender,
    destination: &Waypoint,
    cargo_class: CargoClass,
    offer_payload: Option<OfferPayload>,
) -> ClaimRequest {
    let items = lines
        .iter()
        .map(|line| ClaimItem {
            extra_id: line.product_id.clone(),
            pickup_point: PICKUP_POINT_ID,
            dropoff_point: DROPOFF_POINT_ID,
            title: line.title.clone(),
            length_m: line.item.length_m,
            width_m: line.item.width_m,
            height_m: line.item.height_m,
            weight_kg: line.item.weight_kg,
            cost_value: Money::new(line.unit_price, DECLARED_CURRENCY).round_to_currency(),
            quantity: line.item.quantity,
            age_restricted: false,
        })
        .collect();

    let source = ClaimRoutePoint::new(
        PICKUP_POINT_ID,
        PointType::Source,
        Contact {
            name: sender.contact_name.clone(),
            phone: sender.contact_phone.clone(),
        },
        &sender.waypoint,
    );

    let mut recipient = ClaimRoutePoint::new(
        DROPOFF_POINT_ID,
        PointType::Destination,
        Contact {
            name: order.recipient_name.clone(),
            phone: sanitize_phone(&order.recipient_phone),
        },
        destination,
    );
    recipient.external_order_id = Some(order.order_id.to_string());

    ClaimRequest {
        request_id: ClaimRequestId::generate(),
        items,
        route_points: vec![source, recipient],
        client_requirements: ClientRequirements {
            taxi_class: "cargo".to_string(),
            cargo_type: cargo_class,
            cargo_loaders: 0,
        },
        skip_client_notify: false,
        comment: format!("Order #{}", order.order_number),
        offer_payload,
    }
}

/// Keeps only digits and `+`
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_phone() {
        assert_eq!(sanitize_phone("+7 (916) 123-45-67"), "+79161234567");
        assert_eq!(sanitize_phone("тел. 8 800"), "8800");
        assert_eq!(sanitize_phone(""), "");
    }

    #[test]
    fn test_point_type_names() {
        assert_eq!(PointType::Source.as_str(), "source");
        assert_eq!(serde_json::to_string(&PointType::Destination).unwrap(), "\"destination\"");
    }
}
