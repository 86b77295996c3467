//! Geocoding port
//!
//! The geocoder service itself lives behind [`GeocodingPort`]; the HTTP
//! adapter is in `infra_yandex`, and an in-memory mock is available under
//! the `mock` feature.

use async_trait::async_trait;

use core_kernel::{Coordinates, DomainPort, PortError};

/// What the geocoder reported for one query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeocodeMatch {
    /// Number of matches the service claims to have found
    pub found: u64,
    /// Position of the first match, when it could be parsed
    pub position: Option<Coordinates>,
}

impl GeocodeMatch {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn at(position: Coordinates) -> Self {
        Self {
            found: 1,
            position: Some(position),
        }
    }

    /// Usable coordinates: at least one match and a parseable position
    pub fn best(&self) -> Option<Coordinates> {
        if self.found > 0 {
            self.position
        } else {
            None
        }
    }
}

#[async_trait]
pub trait GeocodingPort: DomainPort {
    /// Looks up a free-text query
    ///
    /// A query that matches nothing is `Ok` with `found == 0`. Errors are
    /// reserved for transport problems and non-success responses.
    async fn geocode(&self, query: &str, api_key: &str) -> Result<GeocodeMatch, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone, Copy)]
    enum Answer {
        Match(Coordinates),
        Failure,
    }

    /// In-memory geocoder that answers from a fixed table and records queries
    #[derive(Debug, Default)]
    pub struct MockGeocodingPort {
        answers: HashMap<String, Answer>,
        queries: Arc<RwLock<Vec<String>>>,
    }

    impl MockGeocodingPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answers `query` with a single match at `position`
        pub fn with_match(mut self, query: impl Into<String>, position: Coordinates) -> Self {
            self.answers.insert(query.into(), Answer::Match(position));
            self
        }

        /// Fails `query` with a connection error
        pub fn with_failure(mut self, query: impl Into<String>) -> Self {
            self.answers.insert(query.into(), Answer::Failure);
            self
        }

        /// Every query received, in order
        pub async fn queries(&self) -> Vec<String> {
            self.queries.read().await.clone()
        }
    }

    impl DomainPort for MockGeocodingPort {}

    #[async_trait]
    impl GeocodingPort for MockGeocodingPort {
        async fn geocode(&self, query: &str, _api_key: &str) -> Result<GeocodeMatch, PortError> {
            self.queries.write().await.push(query.to_string());
            match self.answers.get(query) {
                Some(Answer::Match(position)) => Ok(GeocodeMatch::at(*position)),
                Some(Answer::Failure) => Err(PortError::connection("mock geocoder failure")),
                None => Ok(GeocodeMatch::none()),
            }
        }
    }
}
