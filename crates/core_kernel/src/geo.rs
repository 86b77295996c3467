//! Geographic coordinates
//!
//! The delivery provider and the geocoder both exchange points as
//! `[longitude, latitude]`, so that is the order used here too.

use serde::{Deserialize, Serialize};
use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parses a geocoder position string of the form `"lon lat"`
    pub fn parse_pos(pos: &str) -> Option<Self> {
        let mut parts = pos.split_whitespace();
        let lon = parts.next()?.parse::<f64>().ok()?;
        let lat = parts.next()?.parse::<f64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { lon, lat })
    }

    /// Returns `[lon, lat]` as the provider expects it
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// True when both components are finite, non-zero and within range
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && self.lon != 0.0
            && self.lat != 0.0
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Great-circle distance in kilometers, rounded to two places
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pos() {
        let c = Coordinates::parse_pos("37.617635 55.755814").unwrap();
        assert_eq!(c.lon, 37.617635);
        assert_eq!(c.lat, 55.755814);

        assert!(Coordinates::parse_pos("37.6").is_none());
        assert!(Coordinates::parse_pos("a b").is_none());
        assert!(Coordinates::parse_pos("1 2 3").is_none());
    }

    #[test]
    fn test_validity() {
        assert!(Coordinates::new(37.6, 55.7).is_valid());
        assert!(!Coordinates::new(0.0, 55.7).is_valid());
        assert!(!Coordinates::new(200.0, 55.7).is_valid());
    }

    #[test]
    fn test_distance_is_symmetric_and_plausible() {
        let kremlin = Coordinates::new(37.617635, 55.755814);
        let sheremetyevo = Coordinates::new(37.414589, 55.972642);

        let there = kremlin.distance_km(&sheremetyevo);
        let back = sheremetyevo.distance_km(&kremlin);
        assert_eq!(there, back);
        assert!(there > 25.0 && there < 30.0);
        assert_eq!(kremlin.distance_km(&kremlin), 0.0);
    }
}
