//! Offers and their continuation payloads

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;
use domain_cargo::CandidateClass;

/// Opaque token the provider attaches to an offer
///
/// It is passed back untouched when the claim is created so the booked
/// price matches the quoted one. Nothing in this workspace looks inside it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OfferPayload(Vec<u8>);

impl OfferPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for OfferPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OfferPayload({} bytes)", self.0.len())
    }
}

impl From<String> for OfferPayload {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for OfferPayload {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

// Host metadata stores the payload as text.
impl Serialize for OfferPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = std::str::from_utf8(&self.0).map_err(S::Error::custom)?;
        serializer.serialize_str(text)
    }
}

impl<'de> Deserialize<'de> for OfferPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::from(text))
    }
}

/// The offer chosen by negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub cargo_class: CandidateClass,
    pub price: Money,
    pub payload: Option<OfferPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_debug_hides_content() {
        let payload = OfferPayload::from("secret-offer-token");
        assert_eq!(format!("{payload:?}"), "OfferPayload(18 bytes)");
    }

    #[test]
    fn test_payload_serializes_as_text() {
        let payload = OfferPayload::from("abc==");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "\"abc==\"");

        let back: OfferPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_non_utf8_payload_fails_to_serialize() {
        let payload = OfferPayload::new(vec![0xff, 0xfe]);
        assert!(serde_json::to_string(&payload).is_err());
    }
}
