//! Alternative geocoder queries
//!
//! When the normalised address finds nothing, shorter or repaired forms of
//! the composed text often do. The list is ordered from most to least
//! specific and deduplicated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::address::{strip_country, trim_separators, DEFAULT_CITY};

static STREET_AND_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^,]+,\s*\d+)").expect("valid regex"));
static FIRST_TWO_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^,]+,\s*[^,]+)").expect("valid regex"));
static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+\d+$").expect("valid regex"));

/// Prefix left behind when the country name lost its first bytes
const MANGLED_COUNTRY: &str = "?ия,";

/// Builds the ordered variant list for `text`
///
/// Queries equal to `exclude` (the query already tried) are left out.
pub fn address_variants(text: &str, exclude: &str) -> Vec<String> {
    let text = text.trim();
    let mut variants: Vec<String> = Vec::new();

    if !text.contains('?') {
        variants.push(text.to_string());
    }

    if text.starts_with(MANGLED_COUNTRY) {
        variants.push(text.replacen(MANGLED_COUNTRY, &format!("{DEFAULT_CITY},"), 1));
    }

    if let Some(rest) = strip_country(text) {
        variants.push(rest.to_string());
    }

    if let Some(after_city) = text.split(DEFAULT_CITY).nth(1) {
        let after_city = trim_separators(after_city);
        if !after_city.is_empty() {
            variants.push(with_city(after_city));
        }
    }

    if let Some(m) = STREET_AND_NUMBER.captures(text).and_then(|c| c.get(1)) {
        variants.push(with_city(m.as_str().trim()));
    }

    if let Some(m) = FIRST_TWO_PARTS.captures(text).and_then(|c| c.get(1)) {
        let street = m.as_str().trim();
        if let Some(name) = TRAILING_NUMBER.captures(street).and_then(|c| c.get(1)) {
            variants.push(with_city(name.as_str().trim()));
        }
    }

    if !text.is_empty() && !text.contains(',') {
        variants.push(with_city(text));
    }

    let mut unique: Vec<String> = Vec::with_capacity(variants.len());
    for variant in variants {
        if !variant.is_empty() && variant != exclude && !unique.contains(&variant) {
            unique.push(variant);
        }
    }
    unique
}

fn with_city(rest: &str) -> String {
    format!("{DEFAULT_CITY}, {rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_for_full_russian_address() {
        let text = "Россия, Москва, ул. Тверская, 7, 125009";
        let variants = address_variants(text, "Москва, ул. Тверская, 7, 125009");

        assert_eq!(
            variants,
            vec![
                "Россия, Москва, ул. Тверская, 7, 125009".to_string(),
                "Москва, ул. Тверская, 7".to_string(),
            ]
        );
    }

    #[test]
    fn test_repairs_mangled_country() {
        let variants = address_variants("?ия, Тверская, 7", "");
        assert_eq!(variants[0], "Москва, Тверская, 7");
        assert!(variants.iter().all(|v| !v.starts_with('?')));
    }

    #[test]
    fn test_street_without_house_number() {
        let variants = address_variants("ул. Тверская, д 7", "");
        assert!(variants.contains(&"Москва, ул. Тверская, д".to_string()));
    }

    #[test]
    fn test_strips_leading_country() {
        let variants = address_variants("Россия, Тверская 7", "");
        assert!(variants.contains(&"Тверская 7".to_string()));
    }

    #[test]
    fn test_bare_token_gets_city() {
        let variants = address_variants("Арбат", "");
        assert_eq!(variants, vec!["Арбат".to_string(), "Москва, Арбат".to_string()]);
    }

    #[test]
    fn test_no_duplicates_and_exclusion() {
        let variants = address_variants("Москва, Арбат, 1", "Москва, Арбат, 1");
        let mut deduped = variants.clone();
        deduped.dedup();
        assert_eq!(variants, deduped);
        assert!(!variants.contains(&"Москва, Арбат, 1".to_string()));
    }
}
