//! Claim request and lifecycle tests for domain_claims

use rust_decimal_macros::dec;

use core_kernel::{ClaimRequestId, Coordinates, OrderId, ProviderClaimId};
use domain_cargo::{CargoClass, PhysicalItem};
use domain_claims::{
    build_claim_request, Claim, ClaimError, ClaimLine, ClaimOrder, ClaimStatus, PointType, Sender,
};
use domain_quote::{OfferPayload, Waypoint};

// ============================================================================
// Request Building Tests
// ============================================================================

mod request_tests {
    use super::*;

    fn order() -> ClaimOrder {
        ClaimOrder {
            order_id: OrderId::new(1042),
            order_number: "1042".to_string(),
            recipient_name: "Анна Петрова".to_string(),
            recipient_phone: "+7 (916) 555-12-34".to_string(),
        }
    }

    fn sender() -> Sender {
        Sender {
            waypoint: Waypoint::new(Coordinates::new(37.62, 55.75), "Москва, Складская, 1"),
            contact_name: "Магазин".to_string(),
            contact_phone: "+74950000000".to_string(),
        }
    }

    fn lines() -> Vec<ClaimLine> {
        vec![ClaimLine {
            product_id: "55".to_string(),
            title: "Кресло".to_string(),
            unit_price: dec!(12999.5),
            item: PhysicalItem::new(24.0, 0.9, 0.8, 1.1, 2),
        }]
    }

    fn destination() -> Waypoint {
        Waypoint::new(Coordinates::new(37.59, 55.73), "Москва, Арбат, 1")
    }

    #[test]
    fn test_items_carry_declared_value() {
        let request = build_claim_request(&order(), &lines(), &sender(), &destination(), CargoClass::LcvM, None);

        let item = &request.items[0];
        assert_eq!(item.extra_id, "55");
        assert_eq!(item.title, "Кресло");
        assert_eq!(item.cost_value.to_plain_string(), "12999.50");
        assert_eq!(item.cost_value.currency().code(), "RUB");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.weight_kg, 24.0);
        assert_eq!((item.pickup_point, item.dropoff_point), (1, 2));
        assert!(!item.age_restricted);
    }

    #[test]
    fn test_route_points() {
        let request = build_claim_request(&order(), &lines(), &sender(), &destination(), CargoClass::LcvM, None);

        let source = &request.route_points[0];
        assert_eq!(source.point_type, PointType::Source);
        assert_eq!((source.point_id, source.visit_order), (1, 1));
        assert_eq!(source.contact.name, "Магазин");
        assert_eq!(source.external_order_id, None);

        let recipient = &request.route_points[1];
        assert_eq!(recipient.point_type, PointType::Destination);
        assert_eq!((recipient.point_id, recipient.visit_order), (2, 2));
        assert_eq!(recipient.contact.phone, "+79165551234");
        assert_eq!(recipient.external_order_id.as_deref(), Some("1042"));
        assert_eq!(recipient.fullname, "Москва, Арбат, 1");

        for point in &request.route_points {
            assert!(point.skip_confirmation);
            assert!(!point.leave_under_door && !point.meet_outside && !point.no_door_call);
        }
    }

    #[test]
    fn test_requirements_comment_and_payload() {
        let payload = OfferPayload::from("opaque");
        let request = build_claim_request(
            &order(),
            &lines(),
            &sender(),
            &destination(),
            CargoClass::LcvM,
            Some(payload.clone()),
        );

        assert_eq!(request.client_requirements.taxi_class, "cargo");
        assert_eq!(request.client_requirements.cargo_type, CargoClass::LcvM);
        assert_eq!(request.client_requirements.cargo_loaders, 0);
        assert!(!request.skip_client_notify);
        assert_eq!(request.comment, "Order #1042");
        assert_eq!(request.offer_payload, Some(payload));
    }

    #[test]
    fn test_each_attempt_gets_a_new_request_id() {
        let first = build_claim_request(&order(), &lines(), &sender(), &destination(), CargoClass::Van, None);
        let second = build_claim_request(&order(), &lines(), &sender(), &destination(), CargoClass::Van, None);

        assert!(first.request_id.as_str().starts_with(ClaimRequestId::prefix()));
        assert_ne!(first.request_id, second.request_id);
    }
}

// ============================================================================
// Claim Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_created_but_not_accepted_is_distinct_from_failure() {
        let mut accepted_later = Claim::new(ClaimRequestId::generate());
        accepted_later.mark_created(ProviderClaimId::new("c-9"), None).unwrap();
        accepted_later.mark_accept_failed("409").unwrap();

        let mut failed = Claim::new(ClaimRequestId::generate());
        failed.mark_failed("timeout").unwrap();

        assert_eq!(accepted_later.status, ClaimStatus::AcceptFailed);
        assert!(accepted_later.is_created());
        assert_eq!(failed.status, ClaimStatus::Failed);
        assert!(!failed.is_created());
    }

    #[test]
    fn test_no_transitions_out_of_terminal_states() {
        let mut claim = Claim::new(ClaimRequestId::generate());
        claim.mark_created(ProviderClaimId::new("c-10"), None).unwrap();
        claim.mark_accepted(None).unwrap();

        assert!(matches!(
            claim.mark_accept_failed("late"),
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
        assert!(claim.mark_failed("late").is_err());
        assert_eq!(claim.status, ClaimStatus::Accepted);
    }

    #[test]
    fn test_accept_requires_creation() {
        let mut claim = Claim::new(ClaimRequestId::generate());
        assert!(claim.mark_accepted(None).is_err());
        assert_eq!(claim.status, ClaimStatus::NotStarted);
    }
}

// ============================================================================
// Booking Attempt Tests
// ============================================================================

mod attempt_tests {
    use super::*;
    use test_utils::{claim_line, warehouse_sender, ClaimOrderBuilder, GeoFixtures, PhysicalItemBuilder};

    #[test]
    fn test_repeated_attempts_share_everything_but_request_id() {
        let order = ClaimOrderBuilder::new().order_id(77).order_number("A-77").build();
        let lines = vec![claim_line("3", "Стол", dec!(4500), PhysicalItemBuilder::new().quantity(2).build())];
        let destination = Waypoint::new(GeoFixtures::tverskaya(), GeoFixtures::moscow_query());

        let first = build_claim_request(&order, &lines, &warehouse_sender(), &destination, CargoClass::Van, None);
        let second = build_claim_request(&order, &lines, &warehouse_sender(), &destination, CargoClass::Van, None);

        assert_ne!(first.request_id, second.request_id);
        assert_eq!(first.items, second.items);
        assert_eq!(first.route_points, second.route_points);
        assert_eq!(first.comment, "Order #A-77");
        assert_eq!(first.route_points[1].external_order_id.as_deref(), Some("77"));
    }

    #[test]
    fn test_recipient_phone_keeps_digits_and_plus() {
        let order = ClaimOrderBuilder::new().recipient_phone(" +7 916-555 12 34 доб. 5").build();
        let destination = Waypoint::new(GeoFixtures::tverskaya(), GeoFixtures::moscow_query());

        let request = build_claim_request(&order, &[], &warehouse_sender(), &destination, CargoClass::Van, None);

        assert_eq!(request.route_points[1].contact.phone, "+791655512345");
        assert_eq!(request.route_points[0].coordinates, GeoFixtures::warehouse());
    }
}
