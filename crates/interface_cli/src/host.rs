//! Host store data
//!
//! The shapes a host checkout hands over: cart lines with raw catalogue
//! measurements, destination fields, and placed orders with their shipping
//! lines. All of them deserialize from the JSON files the CLI reads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{DimensionUnit, OrderId, ProviderClaimId, SessionId, WeightUnit};
use domain_cargo::{PhysicalItem, RawMeasurements};
use domain_claims::{ClaimLine, ClaimOrder};
use domain_geo::AddressFields;
use domain_quote::{is_cargo_method, OfferPayload};

/// Units the host catalogue records measurements in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUnits {
    #[serde(default)]
    pub weight: WeightUnit,
    #[serde(default)]
    pub dimension: DimensionUnit,
}

/// A product line on a cart or order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    /// Unit price in the store currency
    #[serde(default)]
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default, flatten)]
    pub measurements: RawMeasurements,
}

impl CartLine {
    pub fn physical_item(&self, units: HostUnits) -> PhysicalItem {
        PhysicalItem::from_measurements(self.measurements, self.quantity, units.weight, units.dimension)
    }

    pub fn claim_line(&self, units: HostUnits) -> ClaimLine {
        ClaimLine {
            product_id: self.product_id.clone(),
            title: self.name.clone(),
            unit_price: self.price,
            item: self.physical_item(units),
        }
    }
}

/// Cart contents at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub destination: AddressFields,
    pub lines: Vec<CartLine>,
    /// Falls back to the configured units when absent
    #[serde(default)]
    pub units: Option<HostUnits>,
}

/// A shipping line chosen on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub method_id: String,
    /// Offer payload copied from the rate at checkout
    #[serde(default)]
    pub payload: Option<OfferPayload>,
}

/// A placed order as the host stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    /// Customer-facing number; the id is used when empty
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub shipping: AddressFields,
    #[serde(default)]
    pub billing: AddressFields,
    #[serde(default)]
    pub shipping_name: String,
    #[serde(default)]
    pub billing_name: String,
    #[serde(default)]
    pub billing_phone: String,
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    /// Payload stored directly on the order
    #[serde(default)]
    pub meta_payload: Option<OfferPayload>,
    /// Checkout session the order was placed from
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Claim already booked for this order
    #[serde(default)]
    pub claim_id: Option<ProviderClaimId>,
    #[serde(default)]
    pub units: Option<HostUnits>,
}

impl OrderSnapshot {
    /// Shipping fields, each one falling back to its billing counterpart
    pub fn destination_fields(&self) -> AddressFields {
        fn pick(shipping: &str, billing: &str) -> String {
            if shipping.trim().is_empty() {
                billing.to_string()
            } else {
                shipping.to_string()
            }
        }

        let (s, b) = (&self.shipping, &self.billing);
        AddressFields {
            country: pick(&s.country, &b.country),
            state: pick(&s.state, &b.state),
            city: pick(&s.city, &b.city),
            address_1: pick(&s.address_1, &b.address_1),
            address_2: pick(&s.address_2, &b.address_2),
            postcode: pick(&s.postcode, &b.postcode),
        }
    }

    pub fn recipient_name(&self) -> &str {
        if self.shipping_name.trim().is_empty() {
            &self.billing_name
        } else {
            &self.shipping_name
        }
    }

    pub fn order_number(&self) -> String {
        if self.order_number.trim().is_empty() {
            self.order_id.to_string()
        } else {
            self.order_number.clone()
        }
    }

    /// True when the order ships with the cargo delivery method
    pub fn has_cargo_shipping(&self) -> bool {
        self.shipping_lines.iter().any(|line| is_cargo_method(&line.method_id))
    }

    /// First non-empty payload on a shipping line
    pub fn shipping_line_payload(&self) -> Option<&OfferPayload> {
        self.shipping_lines
            .iter()
            .filter_map(|line| line.payload.as_ref())
            .find(|payload| !payload.is_empty())
    }

    pub fn claim_order(&self) -> ClaimOrder {
        ClaimOrder {
            order_id: self.order_id,
            order_number: self.order_number(),
            recipient_name: self.recipient_name().to_string(),
            recipient_phone: self.billing_phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order() -> OrderSnapshot {
        serde_json::from_value(serde_json::json!({
            "order_id": 1042,
            "shipping": { "city": "Москва", "address_1": "" },
            "billing": { "country": "RU", "city": "Тверь", "address_1": "Тверская, 7" },
            "billing_name": "Иван Петров",
            "billing_phone": "+7 (916) 555-12-34",
            "lines": [
                { "product_id": "15", "name": "Шкаф", "price": "12999.50", "quantity": 1,
                  "weight": 45.0, "length": 180.0, "width": 60.0, "height": 40.0 }
            ],
            "shipping_lines": [
                { "method_id": "flat_rate" },
                { "method_id": "yandex_delivery_cargo:593616de15330c0fb2d55e55410bf994", "payload": "token" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_destination_falls_back_per_field() {
        let fields = order().destination_fields();
        assert_eq!(fields.country, "RU");
        assert_eq!(fields.city, "Москва");
        assert_eq!(fields.address_1, "Тверская, 7");
    }

    #[test]
    fn test_recipient_and_number_defaults() {
        let order = order();
        assert_eq!(order.recipient_name(), "Иван Петров");
        assert_eq!(order.order_number(), "1042");
        assert_eq!(order.claim_order().recipient_phone, "+7 (916) 555-12-34");
    }

    #[test]
    fn test_cargo_shipping_line_detected() {
        let order = order();
        assert!(order.has_cargo_shipping());
        assert_eq!(order.shipping_line_payload(), Some(&OfferPayload::from("token")));
    }

    #[test]
    fn test_line_measurements_converted() {
        let line = &order().lines[0];
        let item = line.physical_item(HostUnits::default());
        assert!((item.weight_kg - 45.0).abs() < 1e-9);
        assert!((item.length_m - 1.8).abs() < 1e-9);
        assert_eq!(line.claim_line(HostUnits::default()).unit_price, dec!(12999.50));
    }
}
