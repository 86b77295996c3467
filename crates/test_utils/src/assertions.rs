//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than the standard macros.

use core_kernel::{Coordinates, Money};
use domain_cargo::{CandidateClass, CargoClass};
use rust_decimal::Decimal;

/// Asserts that a price has the given amount, ignoring scale
///
/// # Panics
///
/// Panics if the amounts differ
pub fn assert_money_amount(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount().normalize(),
        expected.normalize(),
        "Money amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that two coordinates are within `tolerance` degrees on both axes
pub fn assert_coordinates_near(actual: Coordinates, expected: Coordinates, tolerance: f64) {
    assert!(
        (actual.lon - expected.lon).abs() <= tolerance && (actual.lat - expected.lat).abs() <= tolerance,
        "Coordinates differ: actual=({}, {}), expected=({}, {}), tolerance={}",
        actual.lon,
        actual.lat,
        expected.lon,
        expected.lat,
        tolerance
    );
}

/// Asserts that candidate classes run from smallest to largest without repeats
pub fn assert_candidates_ascending(candidates: &[CandidateClass]) {
    let positions: Vec<usize> = candidates
        .iter()
        .filter_map(CandidateClass::tier)
        .map(|class| {
            CargoClass::ALL
                .iter()
                .position(|c| *c == class)
                .unwrap_or(usize::MAX)
        })
        .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "Candidates are not in ascending order: {:?}",
        candidates
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_amount_ignores_scale() {
        assert_money_amount(&Money::new(dec!(100.00), Currency::RUB), dec!(100));
    }

    #[test]
    #[should_panic(expected = "Money amount mismatch")]
    fn test_money_amount_mismatch_panics() {
        assert_money_amount(&Money::new(dec!(100.00), Currency::RUB), dec!(101));
    }

    #[test]
    fn test_candidates_ascending() {
        assert_candidates_ascending(&[
            CandidateClass::Tier(CargoClass::LcvM),
            CandidateClass::Tier(CargoClass::LcvXl),
        ]);
    }

    #[test]
    #[should_panic(expected = "not in ascending order")]
    fn test_candidates_descending_panics() {
        assert_candidates_ascending(&[
            CandidateClass::Tier(CargoClass::LcvL),
            CandidateClass::Tier(CargoClass::Van),
        ]);
    }
}
