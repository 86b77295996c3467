//! HTTP contract tests for the Yandex adapters
//!
//! A wiremock server stands in for both the cargo API and the geocoder.

use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{Coordinates, Currency, OrderId, PortError, ProviderClaimId};
use domain_cargo::{CandidateClass, CargoClass, PhysicalItem};
use domain_claims::{build_claim_request, ClaimLine, ClaimOrder, ClaimPort, ClaimRequest, Sender};
use domain_geo::GeocodingPort;
use domain_quote::{OfferPayload, PricingPort, PricingRequest, Waypoint};
use infra_yandex::{YandexCargoClient, YandexConfig, YandexGeocoderClient};

const TOKEN: &str = "y0_AgAAAAB1234567890abcdef";

fn cargo_client(server: &MockServer) -> YandexCargoClient {
    YandexCargoClient::new(&YandexConfig::with_base_url(server.uri()), TOKEN).unwrap()
}

fn origin() -> Waypoint {
    Waypoint::new(Coordinates::new(37.62, 55.75), "Москва, Складская, 1")
}

fn destination() -> Waypoint {
    Waypoint::new(Coordinates::new(37.59, 55.73), "Москва, Арбат, 1")
}

fn pricing_request(class: CargoClass) -> PricingRequest {
    PricingRequest::build(
        &[PhysicalItem::new(2.0, 0.4, 0.3, 0.2, 1)],
        &origin(),
        &destination(),
        CandidateClass::Tier(class),
    )
}

fn claim_request(payload: Option<OfferPayload>) -> ClaimRequest {
    let order = ClaimOrder {
        order_id: OrderId::new(501),
        order_number: "501".to_string(),
        recipient_name: "Пётр".to_string(),
        recipient_phone: "8 (903) 111-22-33".to_string(),
    };
    let sender = Sender {
        waypoint: origin(),
        contact_name: "Магазин".to_string(),
        contact_phone: "+74951234567".to_string(),
    };
    let lines = vec![ClaimLine {
        product_id: "17".to_string(),
        title: "Диван".to_string(),
        unit_price: dec!(45000),
        item: PhysicalItem::new(60.0, 2.1, 0.9, 0.8, 1),
    }];
    build_claim_request(&order, &lines, &sender, &destination(), CargoClass::LcvM, payload)
}

// ============================================================================
// offers/calculate
// ============================================================================

mod pricing {
    use super::*;

    #[tokio::test]
    async fn sends_auth_language_and_cargo_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .and(header("accept-language", "ru-RU"))
            .and(body_partial_json(json!({
                "requirements": {"cargo_type": "lcv_m", "taxi_classes": ["cargo"]},
                "route_points": [{"id": 1}, {"id": 2}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "offers": [
                    {"price": {"total_price": "1500.00"}, "offer": {"payload": "p-1"}},
                    {"price": {"total_price": 1320}, "offer": {"payload": "p-2"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = cargo_client(&server)
            .calculate(&pricing_request(CargoClass::LcvM))
            .await
            .unwrap();

        assert_eq!(response.offers.len(), 2);
        assert_eq!(response.offers[0].total_price.unwrap().amount(), dec!(1500));
        assert_eq!(response.offers[1].total_price.unwrap().amount(), dec!(1320));
        assert_eq!(response.offers[1].payload, Some(OfferPayload::from("p-2")));
    }

    #[tokio::test]
    async fn offer_keeps_provider_currency() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "offers": [{"price": {"total_price": "45.90", "currency": "EUR"}, "offer": {"payload": "p-eu"}}]
            })))
            .mount(&server)
            .await;

        let response = cargo_client(&server)
            .calculate(&pricing_request(CargoClass::Van))
            .await
            .unwrap();

        let price = response.offers[0].total_price.unwrap();
        assert_eq!(price.currency(), Currency::EUR);
        assert_eq!(price.amount(), dec!(45.90));
    }

    #[tokio::test]
    async fn empty_offer_list_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offers": []})))
            .mount(&server)
            .await;

        let response = cargo_client(&server)
            .calculate(&pricing_request(CargoClass::Van))
            .await
            .unwrap();
        assert!(response.offers.is_empty());
    }

    #[tokio::test]
    async fn error_payload_with_ok_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "no_such_tariff",
                "message": "Тариф недоступен"
            })))
            .mount(&server)
            .await;

        let err = cargo_client(&server)
            .calculate(&pricing_request(CargoClass::LcvXxl))
            .await
            .unwrap_err();

        assert!(err.is_provider());
        assert_eq!(err.display_message(), "Тариф недоступен");
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = cargo_client(&server)
            .calculate(&pricing_request(CargoClass::Van))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Provider { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/offers/calculate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"offers": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = YandexConfig {
            pricing_timeout_secs: 1,
            ..YandexConfig::with_base_url(server.uri())
        };
        let client = YandexCargoClient::new(&config, TOKEN).unwrap();

        let err = client.calculate(&pricing_request(CargoClass::Van)).await.unwrap_err();
        assert!(matches!(err, PortError::Timeout { duration_ms: 1000, .. }));
        assert!(err.is_transient());
    }
}

// ============================================================================
// claims/create and claims/accept
// ============================================================================

mod claims {
    use super::*;

    #[tokio::test]
    async fn create_sends_request_id_and_wire_shape() {
        let server = MockServer::start().await;
        let request = claim_request(Some(OfferPayload::from("offer-token")));

        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/claims/create"))
            .and(query_param("request_id", request.request_id.as_str()))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .and(body_partial_json(json!({
                "offer_payload": "offer-token",
                "comment": "Order #501",
                "client_requirements": {"taxi_class": "cargo", "cargo_type": "lcv_m", "cargo_loaders": 0},
                "items": [{
                    "extra_id": "17",
                    "cost_value": "45000.00",
                    "cost_currency": "RUB",
                    "size": {"length": 2.1, "width": 0.9, "height": 0.8}
                }],
                "route_points": [
                    {"type": "source", "address": {"coordinates": [37.62, 55.75]}},
                    {"type": "destination", "external_order_id": "501", "contact": {"phone": "89031112233"}}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "6f1c0b4d2a",
                "status": "new"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = cargo_client(&server).create_claim(&request).await.unwrap();
        assert_eq!(created.id, ProviderClaimId::new("6f1c0b4d2a"));
        assert_eq!(created.status.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn create_without_id_returns_blank_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/claims/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "new"})))
            .mount(&server)
            .await;

        let created = cargo_client(&server).create_claim(&claim_request(None)).await.unwrap();
        assert!(created.id.is_blank());
    }

    #[tokio::test]
    async fn create_rejection_keeps_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/claims/create"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "validation_error",
                "message": "Адрес вне зоны доставки"
            })))
            .mount(&server)
            .await;

        let err = cargo_client(&server).create_claim(&claim_request(None)).await.unwrap_err();
        assert!(matches!(err, PortError::Provider { status: Some(400), .. }));
        assert_eq!(err.display_message(), "Адрес вне зоны доставки");
    }

    #[tokio::test]
    async fn non_utf8_payload_is_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = claim_request(Some(OfferPayload::new(vec![0xff, 0xfe])));
        let err = cargo_client(&server).create_claim(&request).await.unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[tokio::test]
    async fn accept_sends_claim_id_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/claims/accept"))
            .and(body_partial_json(json!({"claim_id": "6f1c0b4d2a"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "accepted"})))
            .expect(1)
            .mount(&server)
            .await;

        let accepted = cargo_client(&server)
            .accept_claim(&ProviderClaimId::new("6f1c0b4d2a"))
            .await
            .unwrap();
        assert_eq!(accepted.status.as_deref(), Some("accepted"));
    }

    #[tokio::test]
    async fn accept_conflict_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b2b/cargo/integration/v2/claims/accept"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "state_mismatch",
                "message": "Claim is not ready"
            })))
            .mount(&server)
            .await;

        let err = cargo_client(&server)
            .accept_claim(&ProviderClaimId::new("6f1c0b4d2a"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Provider { status: Some(409), .. }));
    }
}

// ============================================================================
// Geocoder
// ============================================================================

mod geocoder {
    use super::*;

    fn geocoder(server: &MockServer) -> YandexGeocoderClient {
        YandexGeocoderClient::new(&YandexConfig::with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn parses_found_and_position() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.x/"))
            .and(query_param("format", "json"))
            .and(query_param("apikey", "maps-key"))
            .and(query_param("geocode", "Москва, Арбат, 1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"GeoObjectCollection": {
                    "metaDataProperty": {"GeocoderResponseMetaData": {"found": "1"}},
                    "featureMember": [{"GeoObject": {"Point": {"pos": "37.598 55.751"}}}]
                }}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = geocoder(&server).geocode("Москва, Арбат, 1", "maps-key").await.unwrap();
        assert_eq!(found.found, 1);
        assert_eq!(found.best(), Some(Coordinates::new(37.598, 55.751)));
    }

    #[tokio::test]
    async fn zero_matches_is_ok_without_position() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.x/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"GeoObjectCollection": {
                    "metaDataProperty": {"GeocoderResponseMetaData": {"found": "0"}},
                    "featureMember": []
                }}
            })))
            .mount(&server)
            .await;

        let found = geocoder(&server).geocode("нигде", "maps-key").await.unwrap();
        assert_eq!(found.best(), None);
    }

    #[tokio::test]
    async fn forbidden_key_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.x/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "statusCode": 403,
                "error": "Forbidden",
                "message": "Invalid api key"
            })))
            .mount(&server)
            .await;

        let err = geocoder(&server).geocode("Москва", "bad").await.unwrap_err();
        assert!(matches!(err, PortError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn connection_failure_does_not_expose_api_key() {
        // Nothing listens on port 1
        let client = YandexGeocoderClient::new(&YandexConfig::with_base_url("http://127.0.0.1:1")).unwrap();

        let err = client.geocode("Москва", "maps-key-1234567890").await.unwrap_err();

        assert!(err.is_transient() || matches!(err, PortError::Internal { .. }));
        assert!(!err.to_string().contains("maps-key-1234567890"));
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            assert!(!inner.to_string().contains("maps-key-1234567890"));
            source = inner.source();
        }
    }
}
