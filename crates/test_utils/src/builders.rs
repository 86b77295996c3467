//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests set only the fields they care about.

use fake::faker::name::raw::Name;
use fake::locales::EN;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::OrderId;
use domain_cargo::PhysicalItem;
use domain_claims::{ClaimLine, ClaimOrder, Sender};

use crate::fixtures::GeoFixtures;

/// Builder for metric shipment items
#[derive(Debug, Clone)]
pub struct PhysicalItemBuilder {
    weight_kg: f64,
    length_m: f64,
    width_m: f64,
    height_m: f64,
    quantity: u32,
}

impl Default for PhysicalItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalItemBuilder {
    /// A 2 kg parcel of 40 x 30 x 20 cm
    pub fn new() -> Self {
        Self {
            weight_kg: 2.0,
            length_m: 0.4,
            width_m: 0.3,
            height_m: 0.2,
            quantity: 1,
        }
    }

    pub fn weight_kg(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    pub fn size_m(mut self, length_m: f64, width_m: f64, height_m: f64) -> Self {
        self.length_m = length_m;
        self.width_m = width_m;
        self.height_m = height_m;
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn build(self) -> PhysicalItem {
        PhysicalItem::new(self.weight_kg, self.length_m, self.width_m, self.height_m, self.quantity)
    }
}

/// Builder for claim order details, with a generated recipient name
#[derive(Debug, Clone)]
pub struct ClaimOrderBuilder {
    order_id: u64,
    order_number: Option<String>,
    recipient_name: String,
    recipient_phone: String,
}

impl Default for ClaimOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimOrderBuilder {
    pub fn new() -> Self {
        Self {
            order_id: 1042,
            order_number: None,
            recipient_name: Name(EN).fake(),
            recipient_phone: "+7 (916) 555-12-34".to_string(),
        }
    }

    pub fn order_id(mut self, order_id: u64) -> Self {
        self.order_id = order_id;
        self
    }

    pub fn order_number(mut self, number: impl Into<String>) -> Self {
        self.order_number = Some(number.into());
        self
    }

    pub fn recipient_phone(mut self, phone: impl Into<String>) -> Self {
        self.recipient_phone = phone.into();
        self
    }

    pub fn build(self) -> ClaimOrder {
        ClaimOrder {
            order_id: OrderId::new(self.order_id),
            order_number: self.order_number.unwrap_or_else(|| self.order_id.to_string()),
            recipient_name: self.recipient_name,
            recipient_phone: self.recipient_phone,
        }
    }
}

/// A claim line for `item`
pub fn claim_line(product_id: &str, title: &str, unit_price: Decimal, item: PhysicalItem) -> ClaimLine {
    ClaimLine {
        product_id: product_id.to_string(),
        title: title.to_string(),
        unit_price,
        item,
    }
}

/// Sender at the fixture warehouse
pub fn warehouse_sender() -> Sender {
    Sender {
        waypoint: GeoFixtures::warehouse_waypoint(),
        contact_name: "Store".to_string(),
        contact_phone: "+74950000000".to_string(),
    }
}

/// Builder for host order JSON, as the CLI reads it
#[derive(Debug, Clone)]
pub struct HostOrderBuilder {
    order: Value,
}

impl Default for HostOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostOrderBuilder {
    /// Order 1042 shipping one 45 kg wardrobe to Moscow with the cargo method
    pub fn new() -> Self {
        let name: String = Name(EN).fake();
        Self {
            order: json!({
                "order_id": 1042,
                "order_number": "1042",
                "shipping": { "country": "RU", "city": "Москва", "address_1": "Тверская, 7" },
                "billing": { "country": "RU", "city": "Москва", "address_1": "Тверская, 7" },
                "shipping_name": name,
                "billing_phone": "+7 (916) 555-12-34",
                "lines": [host_line("15", "Wardrobe", dec!(12999.50), 1, 45.0, [180.0, 60.0, 40.0])],
                "shipping_lines": [{ "method_id": "yandex_delivery_cargo:593616de15330c0fb2d55e55410bf994" }]
            }),
        }
    }

    pub fn lines(mut self, lines: Vec<Value>) -> Self {
        self.order["lines"] = Value::Array(lines);
        self
    }

    pub fn shipping_method(mut self, method_id: &str) -> Self {
        self.order["shipping_lines"] = json!([{ "method_id": method_id }]);
        self
    }

    pub fn shipping_line_payload(mut self, payload: &str) -> Self {
        self.order["shipping_lines"][0]["payload"] = json!(payload);
        self
    }

    pub fn meta_payload(mut self, payload: &str) -> Self {
        self.order["meta_payload"] = json!(payload);
        self
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.order["session_id"] = json!(session_id);
        self
    }

    pub fn claim_id(mut self, claim_id: &str) -> Self {
        self.order["claim_id"] = json!(claim_id);
        self
    }

    pub fn shipping_city(mut self, city: &str, address_1: &str) -> Self {
        self.order["shipping"] = json!({ "country": "RU", "city": city, "address_1": address_1 });
        self
    }

    /// Clears the shipping fields so billing is used
    pub fn without_shipping_address(mut self) -> Self {
        self.order["shipping"] = json!({});
        self
    }

    pub fn build(self) -> Value {
        self.order
    }
}

/// A host cart or order line in kilograms and centimeters
pub fn host_line(product_id: &str, name: &str, price: Decimal, quantity: i64, weight: f64, size: [f64; 3]) -> Value {
    json!({
        "product_id": product_id,
        "name": name,
        "price": price.to_string(),
        "quantity": quantity,
        "weight": weight,
        "length": size[0],
        "width": size[1],
        "height": size[2],
    })
}
