//! Shipping rates exposed to the host checkout

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use domain_cargo::CandidateClass;

use crate::offer::{Offer, OfferPayload};

/// Shipping method id registered with the host
pub const METHOD_ID: &str = "yandex_delivery_cargo";

/// Rate instance suffix (md5 of `"base"`), kept stable so hosts can match
/// stored rates
const BASE_RATE_SUFFIX: &str = "593616de15330c0fb2d55e55410bf994";

/// Full rate id, `<method>:<suffix>`
pub fn rate_id() -> String {
    format!("{METHOD_ID}:{BASE_RATE_SUFFIX}")
}

/// True when a host shipping line belongs to this method
pub fn is_cargo_method(method_id: &str) -> bool {
    method_id.contains(METHOD_ID)
}

/// Provider data carried alongside the rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMeta {
    pub provider_price: Money,
    pub cargo_class: CandidateClass,
    pub payload: Option<OfferPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub id: String,
    pub label: String,
    pub cost: Money,
    pub meta: RateMeta,
}

impl ShippingRate {
    /// Prices an offer for checkout; the cost never drops below zero
    pub fn from_offer(offer: &Offer, label: impl Into<String>, markup: Decimal) -> Self {
        let cost = Money::new(offer.price.amount() + markup, offer.price.currency())
            .non_negative()
            .round_to_currency();

        Self {
            id: rate_id(),
            label: label.into(),
            cost,
            meta: RateMeta {
                provider_price: offer.price,
                cargo_class: offer.cargo_class,
                payload: offer.payload.clone(),
            },
        }
    }
}
