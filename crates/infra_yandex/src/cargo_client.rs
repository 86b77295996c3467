//! Cargo API client
//!
//! One `reqwest::Client` serves offer calculation, claim creation and claim
//! acceptance. The bearer token and `Accept-Language` are installed as
//! default headers; each call sets its own timeout.
//!
//! # Error Handling
//!
//! - send/read failures -> `PortError::Timeout` / `Connection` / `Internal`
//! - 401/403 -> `PortError::Unauthorized`
//! - other non-success statuses -> `PortError::Provider` with the body's message
//! - a 200 body carrying `code`/`message` -> `PortError::Provider`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use core_kernel::{Currency, DomainPort, PortError, ProviderClaimId};
use domain_claims::{AcceptedClaim, ClaimPort, ClaimRequest, CreatedClaim};
use domain_quote::{OfferPayload, PricingPort, PricingRequest, PricingResponse, QuotedOffer};

use crate::config::YandexConfig;
use crate::dto::{
    AcceptClaimDto, AcceptClaimResponseDto, CalculateRequestDto, CalculateResponseDto,
    CreateClaimDto, CreateClaimResponseDto,
};
use crate::error::{error_fields, status_error, transport_error, YandexError};

const CALCULATE_PATH: &str = "b2b/cargo/integration/v2/offers/calculate";
const CLAIM_CREATE_PATH: &str = "b2b/cargo/integration/v2/claims/create";
const CLAIM_ACCEPT_PATH: &str = "b2b/cargo/integration/v2/claims/accept";

/// Currency assumed when an offer does not name one
const QUOTE_CURRENCY: Currency = Currency::RUB;

/// Client for the cargo integration API
#[derive(Clone)]
pub struct YandexCargoClient {
    http: reqwest::Client,
    base_url: Url,
    config: YandexConfig,
}

impl fmt::Debug for YandexCargoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YandexCargoClient")
            .field("base_url", &self.base_url.as_str())
            .field("oauth_token", &"[REDACTED]")
            .finish()
    }
}

impl YandexCargoClient {
    pub fn new(config: &YandexConfig, oauth_token: &str) -> Result<Self, YandexError> {
        let base_url = parse_base_url(&config.cargo_base_url)?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {oauth_token}"))
            .map_err(|_| YandexError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT_LANGUAGE, accept_language(config)?);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url,
            config: config.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PortError> {
        self.base_url
            .join(path)
            .map_err(|e| PortError::internal(format!("invalid endpoint {path}: {e}")))
    }

    /// POSTs `body` and returns the parsed JSON of a 200 response
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        url: Url,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, PortError> {
        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, timeout, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(operation, timeout, e))?;
        debug!(operation, status = status.as_u16(), body_len = text.len(), "Cargo API response");

        if status != StatusCode::OK {
            return Err(status_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| PortError::transformation(format!("{operation}: invalid JSON: {e}")))
    }
}

impl DomainPort for YandexCargoClient {}

#[async_trait]
impl PricingPort for YandexCargoClient {
    #[instrument(skip(self, request), fields(cargo_type = %request.candidate()))]
    async fn calculate(&self, request: &PricingRequest) -> Result<PricingResponse, PortError> {
        let url = self.endpoint(CALCULATE_PATH)?;
        let body = CalculateRequestDto::from(request);
        let json = self
            .post_json("offers/calculate", url, &body, self.config.pricing_timeout())
            .await?;

        if let Some((code, message)) = error_fields(&json) {
            return Err(PortError::provider(
                Some(StatusCode::OK.as_u16()),
                code,
                message.unwrap_or_else(|| "error payload without message".to_string()),
            ));
        }

        let parsed: CalculateResponseDto = from_value("offers/calculate", json)?;
        let offers = parsed
            .offers
            .iter()
            .map(|offer| {
                let total_price = offer.total_price(QUOTE_CURRENCY);
                if total_price.is_none() {
                    warn!("Offer without a usable total price");
                }
                QuotedOffer {
                    total_price,
                    payload: offer.payload().map(OfferPayload::from),
                }
            })
            .collect();

        Ok(PricingResponse { offers })
    }
}

#[async_trait]
impl ClaimPort for YandexCargoClient {
    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    async fn create_claim(&self, request: &ClaimRequest) -> Result<CreatedClaim, PortError> {
        let body = CreateClaimDto::try_from_request(request)
            .map_err(|e| PortError::transformation(format!("offer payload is not UTF-8: {e}")))?;

        let mut url = self.endpoint(CLAIM_CREATE_PATH)?;
        url.query_pairs_mut()
            .append_pair("request_id", request.request_id.as_str());

        let json = self
            .post_json("claims/create", url, &body, self.config.claim_create_timeout())
            .await?;
        let parsed: CreateClaimResponseDto = from_value("claims/create", json)?;

        Ok(CreatedClaim {
            id: ProviderClaimId::new(parsed.id.unwrap_or_default()),
            status: parsed.status,
        })
    }

    #[instrument(skip(self))]
    async fn accept_claim(&self, claim_id: &ProviderClaimId) -> Result<AcceptedClaim, PortError> {
        let url = self.endpoint(CLAIM_ACCEPT_PATH)?;
        let body = AcceptClaimDto {
            claim_id: claim_id.as_str().to_string(),
        };

        let json = self
            .post_json("claims/accept", url, &body, self.config.claim_accept_timeout())
            .await?;
        let parsed: AcceptClaimResponseDto = from_value("claims/accept", json)?;

        Ok(AcceptedClaim {
            status: parsed.status,
        })
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, YandexError> {
    // `Url::join` replaces the last segment unless the base ends with '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|source| YandexError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })
}

pub(crate) fn accept_language(config: &YandexConfig) -> Result<HeaderValue, YandexError> {
    HeaderValue::from_str(&config.accept_language).map_err(|_| YandexError::InvalidHeader {
        header: "Accept-Language",
        value: config.accept_language.clone(),
    })
}

fn from_value<T: DeserializeOwned>(operation: &str, json: Value) -> Result<T, PortError> {
    serde_json::from_value(json)
        .map_err(|e| PortError::transformation(format!("{operation}: unexpected body: {e}")))
}
