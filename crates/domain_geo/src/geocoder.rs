//! Address resolution workflow

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::Coordinates;

use crate::address::{normalize_address, Address};
use crate::ports::GeocodingPort;
use crate::variants::address_variants;

/// Keys shorter than this are treated as missing
pub const MIN_API_KEY_LEN: usize = 10;

/// How a set of coordinates was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionSource {
    /// The normalised address matched
    Exact,
    /// One of the alternative queries matched
    Variant,
    /// Nothing matched; the default city centre was used
    CityFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub coordinates: Coordinates,
    pub source: ResolutionSource,
    /// Query that produced the match, absent for the city fallback
    pub query: Option<String>,
}

impl Resolution {
    pub fn is_approximate(&self) -> bool {
        self.source == ResolutionSource::CityFallback
    }
}

/// Default city used when geocoding gives nothing back
#[derive(Debug, Clone, PartialEq)]
pub struct CityFallback {
    pub name: String,
    /// Lowercase substrings that identify the city in free text
    pub markers: Vec<String>,
    pub centre: Coordinates,
}

impl CityFallback {
    pub fn moscow() -> Self {
        Self {
            name: "Moscow".to_string(),
            markers: vec!["москва".to_string(), "moscow".to_string(), "мск".to_string()],
            centre: Coordinates::new(37.617635, 55.755814),
        }
    }

    /// True when any text mentions the city, ignoring case
    pub fn matches(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| {
            let lower = text.to_lowercase();
            self.markers.iter().any(|marker| lower.contains(marker.as_str()))
        })
    }
}

impl Default for CityFallback {
    fn default() -> Self {
        Self::moscow()
    }
}

/// Resolves free-text addresses through a [`GeocodingPort`]
pub struct Geocoder {
    port: Arc<dyn GeocodingPort>,
    api_key: Option<String>,
    fallback: CityFallback,
}

impl Geocoder {
    pub fn new(port: Arc<dyn GeocodingPort>, api_key: Option<String>) -> Self {
        Self {
            port,
            api_key,
            fallback: CityFallback::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: CityFallback) -> Self {
        self.fallback = fallback;
        self
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| key.chars().count() >= MIN_API_KEY_LEN)
    }

    pub fn has_usable_key(&self) -> bool {
        self.usable_key().is_some()
    }

    /// Resolves `address_text`, trying variants and then the city fallback
    ///
    /// `hints` are extra host fields (city, first address line) checked for
    /// the default city marker.
    #[instrument(skip(self, hints), fields(address = %address_text))]
    pub async fn resolve(&self, address_text: &str, hints: &[&str]) -> Option<Resolution> {
        let normalized = normalize_address(address_text);
        if normalized != address_text {
            debug!(original = %address_text, improved = %normalized, "Address format improved");
        }

        match self.usable_key() {
            Some(key) => {
                if !normalized.is_empty() {
                    if let Some(found) = self.lookup(&normalized, key, ResolutionSource::Exact).await {
                        return Some(found);
                    }
                }

                let variants = address_variants(address_text, &normalized);
                debug!(variants = ?variants, "Trying geocoding variants");
                for variant in &variants {
                    if let Some(found) = self.lookup(variant, key, ResolutionSource::Variant).await {
                        return Some(found);
                    }
                }
                warn!(variants_tried = variants.len(), "All geocoding variants failed");
            }
            None => {
                let key_length = self.api_key.as_deref().map(|k| k.trim().chars().count()).unwrap_or(0);
                warn!(key_length, "Geocoding skipped: maps API key missing or too short");
            }
        }

        let mut texts = vec![address_text, normalized.as_str()];
        texts.extend_from_slice(hints);
        if self.fallback.matches(&texts) {
            warn!(
                city = %self.fallback.name,
                lon = self.fallback.centre.lon,
                lat = self.fallback.centre.lat,
                "Using approximate city centre coordinates"
            );
            return Some(Resolution {
                coordinates: self.fallback.centre,
                source: ResolutionSource::CityFallback,
                query: None,
            });
        }

        info!("Geocoding found no match and no fallback city applies");
        None
    }

    /// Resolves an [`Address`] in place of its free text
    pub async fn locate(&self, address: Address, hints: &[&str]) -> Address {
        match self.resolve(address.free_text(), hints).await {
            Some(resolution) => address.resolved(resolution),
            None => address,
        }
    }

    async fn lookup(&self, query: &str, key: &str, source: ResolutionSource) -> Option<Resolution> {
        match self.port.geocode(query, key).await {
            Ok(result) => match result.best() {
                Some(coordinates) => {
                    info!(query, lon = coordinates.lon, lat = coordinates.lat, ?source, "Geocoding succeeded");
                    Some(Resolution {
                        coordinates,
                        source,
                        query: Some(query.to_string()),
                    })
                }
                None => {
                    debug!(query, found = result.found, "Geocoding returned no usable match");
                    None
                }
            },
            Err(error) => {
                warn!(query, error = %error, "Geocoding request failed");
                None
            }
        }
    }
}

impl fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geocoder")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockGeocodingPort;

    const KEY: &str = "0123456789abcdef";

    #[tokio::test]
    async fn test_exact_match_uses_normalized_query() {
        let port = Arc::new(
            MockGeocodingPort::new().with_match("Москва, Тверская, 7", Coordinates::new(37.61, 55.76)),
        );
        let geocoder = Geocoder::new(port.clone(), Some(KEY.to_string()));

        let resolution = geocoder.resolve("Россия, Москва, Тверская, 7", &[]).await.unwrap();
        assert_eq!(resolution.source, ResolutionSource::Exact);
        assert_eq!(port.queries().await, vec!["Москва, Тверская, 7".to_string()]);
    }

    #[tokio::test]
    async fn test_short_key_skips_lookups() {
        let port = Arc::new(MockGeocodingPort::new());
        let geocoder = Geocoder::new(port.clone(), Some("short".to_string()));

        let resolution = geocoder.resolve("Москва, Арбат, 1", &[]).await.unwrap();
        assert!(resolution.is_approximate());
        assert!(port.queries().await.is_empty());
        assert!(!geocoder.has_usable_key());
    }

    #[tokio::test]
    async fn test_no_marker_is_none() {
        let port = Arc::new(MockGeocodingPort::new());
        let geocoder = Geocoder::new(port, Some(KEY.to_string()));
        assert!(geocoder.resolve("Kazakhstan, Almaty, Abay 10", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_variant_tried_after_failed_request() {
        let port = Arc::new(
            MockGeocodingPort::new()
                .with_failure("Москва, Тверская, 7, 125009")
                .with_match("Москва, Тверская, 7", Coordinates::new(37.61, 55.76)),
        );
        let geocoder = Geocoder::new(port.clone(), Some(KEY.to_string()));

        let resolution = geocoder.resolve("Россия, Москва, Тверская, 7, 125009", &[]).await.unwrap();
        assert_eq!(resolution.source, ResolutionSource::Variant);
        assert_eq!(resolution.query.as_deref(), Some("Москва, Тверская, 7"));
        assert_eq!(
            port.queries().await,
            vec![
                "Москва, Тверская, 7, 125009".to_string(),
                "Россия, Москва, Тверская, 7, 125009".to_string(),
                "Москва, Тверская, 7".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_from_hints() {
        let port = Arc::new(MockGeocodingPort::new());
        let geocoder = Geocoder::new(port, Some(KEY.to_string()));

        let resolution = geocoder
            .resolve("Россия, Zelenograd, Panfilovsky 10", &["МСК", "Panfilovsky 10"])
            .await
            .unwrap();
        assert!(resolution.is_approximate());
        assert_eq!(resolution.coordinates, Coordinates::new(37.617635, 55.755814));
    }

    #[tokio::test]
    async fn test_locate_fills_address() {
        let port = Arc::new(MockGeocodingPort::new().with_match("Москва, Арбат, 1", Coordinates::new(37.59, 55.75)));
        let geocoder = Geocoder::new(port, Some(KEY.to_string()));

        let address = geocoder.locate(Address::new("Москва, Арбат, 1"), &[]).await;
        assert_eq!(address.coordinates(), Some(Coordinates::new(37.59, 55.75)));
    }

    #[tokio::test]
    async fn test_custom_fallback_city() {
        let kazan = CityFallback {
            name: "Kazan".to_string(),
            markers: vec!["казань".to_string()],
            centre: Coordinates::new(49.106414, 55.796127),
        };
        let geocoder = Geocoder::new(Arc::new(MockGeocodingPort::new()), None).with_fallback(kazan);

        let resolution = geocoder.resolve("Россия, Казань, Баумана, 10", &[]).await.unwrap();
        assert_eq!(resolution.coordinates, Coordinates::new(49.106414, 55.796127));
        assert!(geocoder.resolve("Москва, Арбат, 1", &[]).await.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let geocoder = Geocoder::new(Arc::new(MockGeocodingPort::new()), Some(KEY.to_string()));
        assert!(!format!("{geocoder:?}").contains(KEY));
    }
}
