//! Claim submission
//!
//! Creation and acceptance are tracked separately. The claim id is written
//! to the order record as soon as the provider confirms creation and before
//! acceptance is attempted, so a failed acceptance never loses the id.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use core_kernel::{OrderId, PortError};

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::{ClaimPort, OrderRecordPort};
use crate::request::ClaimRequest;

/// Result of one booking attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimOutcome {
    pub claim: Claim,
    /// Note appended to the order
    pub note: String,
}

impl ClaimOutcome {
    pub fn status(&self) -> ClaimStatus {
        self.claim.status
    }

    pub fn is_created(&self) -> bool {
        self.claim.is_created()
    }
}

pub struct ClaimSubmitter {
    claims: Arc<dyn ClaimPort>,
    records: Arc<dyn OrderRecordPort>,
}

impl ClaimSubmitter {
    pub fn new(claims: Arc<dyn ClaimPort>, records: Arc<dyn OrderRecordPort>) -> Self {
        Self { claims, records }
    }

    /// Creates and accepts a claim for `order_id`
    ///
    /// Never returns an error: every way this can end is a [`ClaimOutcome`]
    /// and is also written to the order as a note.
    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    pub async fn submit(&self, order_id: OrderId, request: &ClaimRequest) -> ClaimOutcome {
        let mut claim = Claim::new(request.request_id.clone());

        let created = match self.claims.create_claim(request).await {
            Ok(created) => created,
            Err(err) => {
                let note = creation_failure_note(&err);
                error!(error = %err, "Claim creation failed");
                return self.finish(order_id, claim_failed(claim, &note), note).await;
            }
        };

        if let Err(err) = claim.mark_created(created.id.clone(), created.status.clone()) {
            let note = match &err {
                ClaimError::MissingClaimId => "Error: the provider did not return a claim id".to_string(),
                other => format!("Error: {other}"),
            };
            error!(error = %err, "Claim creation response unusable");
            return self.finish(order_id, claim_failed(claim, &note), note).await;
        }

        info!(claim_id = %created.id, provider_status = ?created.status, "Claim created");
        if let Err(err) = self
            .records
            .save_claim(order_id, &created.id, request.offer_payload.as_ref())
            .await
        {
            error!(claim_id = %created.id, error = %err, "Failed to record claim id on the order");
        }

        let note = match self.claims.accept_claim(&created.id).await {
            Ok(accepted) => {
                info!(claim_id = %created.id, status = ?accepted.status, "Claim accepted");
                settle(claim.mark_accepted(accepted.status));
                format!("Delivery claim created and accepted. Claim ID: {}", created.id)
            }
            Err(err) => {
                warn!(claim_id = %created.id, error = %err, "Claim acceptance failed");
                settle(claim.mark_accept_failed(err.display_message()));
                format!("Delivery claim created, but acceptance failed. Claim ID: {}", created.id)
            }
        };

        self.finish(order_id, claim, note).await
    }

    async fn finish(&self, order_id: OrderId, claim: Claim, note: String) -> ClaimOutcome {
        if let Err(err) = self.records.add_note(order_id, &note).await {
            warn!(error = %err, "Failed to add order note");
        }
        ClaimOutcome { claim, note }
    }
}

fn creation_failure_note(err: &PortError) -> String {
    match err {
        PortError::Provider { .. } | PortError::Unauthorized { .. } => {
            format!("Delivery API error: {}", err.display_message())
        }
        other => format!("Claim creation failed: {other}"),
    }
}

fn claim_failed(mut claim: Claim, reason: &str) -> Claim {
    settle(claim.mark_failed(reason));
    claim
}

// Transitions out of `NotStarted`/`Created` are always legal here.
fn settle(result: Result<(), ClaimError>) {
    if let Err(err) = result {
        error!(error = %err, "Unexpected claim state transition");
    }
}
