//! Quote sessions
//!
//! A quote made at checkout has to be remembered until the order is
//! placed, so that booking can reuse the offer payload and the resolved
//! destination. Sessions are keyed by the host's checkout session id and
//! expire after a fixed lifetime.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{Coordinates, DomainPort, PortError, SessionId};
use domain_cargo::CandidateClass;

use crate::offer::OfferPayload;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDestination {
    pub coordinates: Coordinates,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSession {
    pub session_id: SessionId,
    pub payload: Option<OfferPayload>,
    pub destination: SessionDestination,
    pub cargo_class: CandidateClass,
    pub created_at: DateTime<Utc>,
}

impl QuoteSession {
    pub fn new(
        session_id: SessionId,
        payload: Option<OfferPayload>,
        destination: SessionDestination,
        cargo_class: CandidateClass,
    ) -> Self {
        Self {
            session_id,
            payload,
            destination,
            cargo_class,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}

/// Storage for quote sessions between checkout and booking
#[async_trait]
pub trait QuoteSessionStore: DomainPort {
    /// Stores `session`, replacing any earlier one for the same id
    async fn save(&self, session: QuoteSession) -> Result<(), PortError>;

    /// Reads a live session without consuming it
    async fn get(&self, session_id: &SessionId) -> Result<Option<QuoteSession>, PortError>;

    /// Removes and returns a live session
    async fn take(&self, session_id: &SessionId) -> Result<Option<QuoteSession>, PortError>;

    /// Drops expired sessions and reports how many were removed
    async fn purge_expired(&self) -> Result<usize, PortError>;
}

/// Process-local session store
#[derive(Debug)]
pub struct InMemoryQuoteSessionStore {
    sessions: RwLock<HashMap<SessionId, QuoteSession>>,
    ttl: Duration,
}

impl InMemoryQuoteSessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for InMemoryQuoteSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for InMemoryQuoteSessionStore {}

#[async_trait]
impl QuoteSessionStore for InMemoryQuoteSessionStore {
    async fn save(&self, session: QuoteSession) -> Result<(), PortError> {
        debug!(session_id = %session.session_id, has_payload = session.payload.is_some(), "Saving quote session");
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<QuoteSession>, PortError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .filter(|session| !session.is_expired(self.ttl, now))
            .cloned())
    }

    async fn take(&self, session_id: &SessionId) -> Result<Option<QuoteSession>, PortError> {
        let now = Utc::now();
        let session = self.sessions.write().await.remove(session_id);
        Ok(session.filter(|session| !session.is_expired(self.ttl, now)))
    }

    async fn purge_expired(&self) -> Result<usize, PortError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl, now));
        Ok(before - sessions.len())
    }
}
