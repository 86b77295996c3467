//! Geocoder client
//!
//! `GET {base}/1.x/?format=json&apikey=..&geocode=..`. The API key is passed
//! per call and never logged.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;

use core_kernel::{Coordinates, DomainPort, PortError};
use domain_geo::{GeocodeMatch, GeocodingPort};

use crate::cargo_client::{accept_language, parse_base_url};
use crate::config::YandexConfig;
use crate::dto::GeocoderEnvelopeDto;
use crate::error::{status_error, transport_error, YandexError};

const GEOCODE_PATH: &str = "1.x/";

#[derive(Debug, Clone)]
pub struct YandexGeocoderClient {
    http: reqwest::Client,
    base_url: Url,
    config: YandexConfig,
}

impl YandexGeocoderClient {
    pub fn new(config: &YandexConfig) -> Result<Self, YandexError> {
        let base_url = parse_base_url(&config.geocoder_base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, accept_language(config)?);
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url,
            config: config.clone(),
        })
    }
}

impl DomainPort for YandexGeocoderClient {}

#[async_trait]
impl GeocodingPort for YandexGeocoderClient {
    #[instrument(skip(self, api_key))]
    async fn geocode(&self, query: &str, api_key: &str) -> Result<GeocodeMatch, PortError> {
        let timeout = self.config.geocode_timeout();
        let mut url = self
            .base_url
            .join(GEOCODE_PATH)
            .map_err(|e| PortError::internal(format!("invalid geocoder endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("apikey", api_key)
            .append_pair("geocode", query);

        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error("geocode", timeout, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error("geocode", timeout, e))?;

        if status != StatusCode::OK {
            return Err(status_error(status, &text));
        }

        let envelope: GeocoderEnvelopeDto = serde_json::from_str(&text)
            .map_err(|e| PortError::transformation(format!("geocode: invalid JSON: {e}")))?;

        let found = envelope.found();
        let position = envelope.first_pos().and_then(Coordinates::parse_pos);
        debug!(found, has_position = position.is_some(), "Geocoder answered");

        Ok(GeocodeMatch { found, position })
    }
}
