//! Destination addresses

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use core_kernel::Coordinates;

use crate::error::GeoError;
use crate::geocoder::Resolution;

/// Country token the provider's geocoder expects for `RU`
pub const COUNTRY_RU: &str = "Россия";
/// City prefixed to addresses that carry no comma at all
pub const DEFAULT_CITY: &str = "Москва";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static REPEATED_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",+").expect("valid regex"));

/// Address fields as the host stores them on carts and orders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub postcode: String,
}

impl AddressFields {
    /// True when no field carries any text
    pub fn is_blank(&self) -> bool {
        [
            &self.country,
            &self.state,
            &self.city,
            &self.address_1,
            &self.address_2,
            &self.postcode,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }

    /// Text fields worth checking for a default city marker
    pub fn hints(&self) -> Vec<&str> {
        vec![self.city.as_str(), self.address_1.as_str()]
    }
}

/// A destination as free text, plus coordinates once resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    free_text: String,
    resolution: Option<Resolution>,
}

impl Address {
    pub fn new(free_text: impl Into<String>) -> Self {
        Self {
            free_text: free_text.into(),
            resolution: None,
        }
    }

    /// Joins the non-empty fields with `", "`, spelling `RU` as the country name
    pub fn compose(fields: &AddressFields) -> Result<Self, GeoError> {
        let country = if fields.country.trim().eq_ignore_ascii_case("RU") {
            COUNTRY_RU
        } else {
            fields.country.trim()
        };

        let text = [
            country,
            fields.state.trim(),
            fields.city.trim(),
            fields.address_1.trim(),
            fields.address_2.trim(),
            fields.postcode.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        if text.is_empty() {
            return Err(GeoError::EmptyAddress);
        }
        Ok(Self::new(text))
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn normalized(&self) -> String {
        normalize_address(&self.free_text)
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.resolution.as_ref().map(|r| r.coordinates)
    }

    pub(crate) fn resolved(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

/// Cleans up composed address text before geocoding
///
/// Collapses whitespace and repeated commas, trims separators, drops a
/// leading country token and prefixes the default city when the text has
/// no comma left.
pub fn normalize_address(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let collapsed = REPEATED_COMMAS.replace_all(&collapsed, ",");
    let mut address = trim_separators(&collapsed).to_string();

    if let Some(rest) = strip_country(&address) {
        address = trim_separators(rest).to_string();
    }

    if !address.is_empty() && !address.contains(',') {
        address = format!("{DEFAULT_CITY}, {address}");
    }
    address
}

pub(crate) fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c == ',' || c == ' ')
}

/// Text after a leading `"Россия,"`, trimmed
pub(crate) fn strip_country(text: &str) -> Option<&str> {
    text.strip_prefix(COUNTRY_RU)
        .and_then(|rest| rest.strip_prefix(','))
        .map(str::trim)
}
