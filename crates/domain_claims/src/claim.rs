//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimRequestId, ProviderClaimId};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Request built, nothing sent yet
    NotStarted,
    /// Provider confirmed creation and returned an id
    Created,
    /// Provider accepted the created claim
    Accepted,
    /// Created, but the acceptance call failed
    AcceptFailed,
    /// Creation never succeeded
    Failed,
}

impl ClaimStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Accepted | ClaimStatus::AcceptFailed | ClaimStatus::Failed)
    }
}

/// One claim creation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Idempotency key sent with the creation request
    pub request_id: ClaimRequestId,
    /// Provider id, present from `Created` onwards
    pub claim_id: Option<ProviderClaimId>,
    pub status: ClaimStatus,
    /// Status string last reported by the provider
    pub provider_status: Option<String>,
    /// Human-readable cause of a failure
    pub failure: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Starts a new attempt
    pub fn new(request_id: ClaimRequestId) -> Self {
        let now = Utc::now();
        Self {
            request_id,
            claim_id: None,
            status: ClaimStatus::NotStarted,
            provider_status: None,
            failure: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a confirmed creation
    pub fn mark_created(
        &mut self,
        claim_id: ProviderClaimId,
        provider_status: Option<String>,
    ) -> Result<(), ClaimError> {
        if claim_id.is_blank() {
            return Err(ClaimError::MissingClaimId);
        }
        self.update_status(ClaimStatus::Created)?;
        self.claim_id = Some(claim_id);
        self.provider_status = provider_status;
        Ok(())
    }

    pub fn mark_accepted(&mut self, provider_status: Option<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Accepted)?;
        if provider_status.is_some() {
            self.provider_status = provider_status;
        }
        Ok(())
    }

    pub fn mark_accept_failed(&mut self, reason: impl Into<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::AcceptFailed)?;
        self.failure = Some(reason.into());
        Ok(())
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Failed)?;
        self.failure = Some(reason.into());
        Ok(())
    }

    /// True once the provider has assigned an id
    pub fn is_created(&self) -> bool {
        self.claim_id.is_some()
    }

    fn update_status(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", status),
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (NotStarted, Created) |
            (NotStarted, Failed) |
            (Created, Accepted) |
            (Created, AcceptFailed)
        )
    }
}
