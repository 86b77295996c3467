//! Claims Domain Ports
//!
//! Two collaborators sit behind traits here:
//!
//! - [`ClaimPort`]: the provider's claim create/accept endpoints
//! - [`OrderRecordPort`]: the host's order store, where the claim id,
//!   the offer payload and human-readable notes are kept
//!
//! Both are consumed through `Arc<dyn ...>` by [`ClaimSubmitter`](crate::ClaimSubmitter).

use async_trait::async_trait;

use core_kernel::{DomainPort, OrderId, PortError, ProviderClaimId};
use domain_quote::OfferPayload;

use crate::request::ClaimRequest;

/// Creation response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedClaim {
    /// Blank when the provider answered without an id
    pub id: ProviderClaimId,
    pub status: Option<String>,
}

/// Acceptance response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedClaim {
    pub status: Option<String>,
}

#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Creates a claim; the request id doubles as the idempotency key
    ///
    /// Non-success statuses come back as [`PortError::Provider`] carrying
    /// the provider's message.
    async fn create_claim(&self, request: &ClaimRequest) -> Result<CreatedClaim, PortError>;

    /// Accepts a created claim by id
    async fn accept_claim(&self, claim_id: &ProviderClaimId) -> Result<AcceptedClaim, PortError>;
}

#[async_trait]
pub trait OrderRecordPort: DomainPort {
    /// Claim id recorded against the order, if any
    async fn claim_id(&self, order_id: OrderId) -> Result<Option<ProviderClaimId>, PortError>;

    /// Records a created claim and the payload it was booked with
    async fn save_claim(
        &self,
        order_id: OrderId,
        claim_id: &ProviderClaimId,
        payload: Option<&OfferPayload>,
    ) -> Result<(), PortError>;

    /// Appends a note to the order history
    async fn add_note(&self, order_id: OrderId, note: &str) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone)]
    enum CreateScript {
        Created(String),
        MissingId,
        Rejected(u16, String),
        Timeout,
    }

    /// Scripted provider claim endpoints
    #[derive(Debug)]
    pub struct MockClaimPort {
        create: CreateScript,
        accept_ok: bool,
        created: Arc<RwLock<Vec<ClaimRequest>>>,
        accepted: Arc<RwLock<Vec<ProviderClaimId>>>,
    }

    impl MockClaimPort {
        /// Creates every claim with `claim_id` and accepts it
        pub fn accepting(claim_id: impl Into<String>) -> Self {
            Self {
                create: CreateScript::Created(claim_id.into()),
                accept_ok: true,
                created: Arc::default(),
                accepted: Arc::default(),
            }
        }

        /// Rejects creation with `status` and `message`
        pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
            Self {
                create: CreateScript::Rejected(status, message.into()),
                ..Self::accepting("")
            }
        }

        /// Answers creation without an id
        pub fn missing_id() -> Self {
            Self {
                create: CreateScript::MissingId,
                ..Self::accepting("")
            }
        }

        /// Times out on creation
        pub fn timing_out() -> Self {
            Self {
                create: CreateScript::Timeout,
                ..Self::accepting("")
            }
        }

        /// Fails acceptance after a successful creation
        pub fn failing_accept(mut self) -> Self {
            self.accept_ok = false;
            self
        }

        pub async fn created_requests(&self) -> Vec<ClaimRequest> {
            self.created.read().await.clone()
        }

        pub async fn accepted_ids(&self) -> Vec<ProviderClaimId> {
            self.accepted.read().await.clone()
        }
    }

    impl DomainPort for MockClaimPort {}

    #[async_trait]
    impl ClaimPort for MockClaimPort {
        async fn create_claim(&self, request: &ClaimRequest) -> Result<CreatedClaim, PortError> {
            self.created.write().await.push(request.clone());
            match &self.create {
                CreateScript::Created(id) => Ok(CreatedClaim {
                    id: ProviderClaimId::new(id.clone()),
                    status: Some("new".to_string()),
                }),
                CreateScript::MissingId => Ok(CreatedClaim {
                    id: ProviderClaimId::new(""),
                    status: None,
                }),
                CreateScript::Rejected(status, message) => {
                    Err(PortError::provider(Some(*status), None, message.clone()))
                }
                CreateScript::Timeout => Err(PortError::Timeout {
                    operation: "claims/create".to_string(),
                    duration_ms: 30_000,
                }),
            }
        }

        async fn accept_claim(&self, claim_id: &ProviderClaimId) -> Result<AcceptedClaim, PortError> {
            self.accepted.write().await.push(claim_id.clone());
            if self.accept_ok {
                Ok(AcceptedClaim {
                    status: Some("accepted".to_string()),
                })
            } else {
                Err(PortError::provider(Some(409), None, "claim is not ready for acceptance"))
            }
        }
    }

    /// In-memory host order store
    #[derive(Debug, Default)]
    pub struct MockOrderRecordPort {
        claims: Arc<RwLock<HashMap<OrderId, ProviderClaimId>>>,
        payloads: Arc<RwLock<HashMap<OrderId, OfferPayload>>>,
        notes: Arc<RwLock<HashMap<OrderId, Vec<String>>>>,
    }

    impl MockOrderRecordPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates an existing claim id
        pub async fn with_claim(self, order_id: OrderId, claim_id: impl Into<String>) -> Self {
            self.claims
                .write()
                .await
                .insert(order_id, ProviderClaimId::new(claim_id));
            self
        }

        pub async fn notes(&self, order_id: OrderId) -> Vec<String> {
            self.notes.read().await.get(&order_id).cloned().unwrap_or_default()
        }

        pub async fn payload(&self, order_id: OrderId) -> Option<OfferPayload> {
            self.payloads.read().await.get(&order_id).cloned()
        }
    }

    impl DomainPort for MockOrderRecordPort {}

    #[async_trait]
    impl OrderRecordPort for MockOrderRecordPort {
        async fn claim_id(&self, order_id: OrderId) -> Result<Option<ProviderClaimId>, PortError> {
            Ok(self.claims.read().await.get(&order_id).cloned())
        }

        async fn save_claim(
            &self,
            order_id: OrderId,
            claim_id: &ProviderClaimId,
            payload: Option<&OfferPayload>,
        ) -> Result<(), PortError> {
            self.claims.write().await.insert(order_id, claim_id.clone());
            if let Some(payload) = payload {
                self.payloads.write().await.insert(order_id, payload.clone());
            }
            Ok(())
        }

        async fn add_note(&self, order_id: OrderId, note: &str) -> Result<(), PortError> {
            self.notes
                .write()
                .await
                .entry(order_id)
                .or_default()
                .push(note.to_string());
            Ok(())
        }
    }
}
