//! In-process order ledger
//!
//! Stands in for the host order store when the workflows run from the
//! command line. Seeded from an [`OrderSnapshot`] so a previously booked
//! claim id is visible to the booking workflow.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use core_kernel::{DomainPort, OrderId, PortError, ProviderClaimId};
use domain_claims::OrderRecordPort;
use domain_quote::OfferPayload;

use crate::host::OrderSnapshot;

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderRecord {
    claim_id: Option<ProviderClaimId>,
    payload: Option<OfferPayload>,
    notes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRecords {
    records: RwLock<HashMap<OrderId, OrderRecord>>,
}

impl InMemoryOrderRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(order: &OrderSnapshot) -> Self {
        let record = OrderRecord {
            claim_id: order.claim_id.clone().filter(|id| !id.is_blank()),
            payload: order.meta_payload.clone(),
            notes: Vec::new(),
        };
        Self {
            records: RwLock::new(HashMap::from([(order.order_id, record)])),
        }
    }

    pub async fn notes(&self, order_id: OrderId) -> Vec<String> {
        self.records
            .read()
            .await
            .get(&order_id)
            .map(|record| record.notes.clone())
            .unwrap_or_default()
    }

    pub async fn payload(&self, order_id: OrderId) -> Option<OfferPayload> {
        self.records
            .read()
            .await
            .get(&order_id)
            .and_then(|record| record.payload.clone())
    }
}

impl DomainPort for InMemoryOrderRecords {}

#[async_trait]
impl OrderRecordPort for InMemoryOrderRecords {
    async fn claim_id(&self, order_id: OrderId) -> Result<Option<ProviderClaimId>, PortError> {
        Ok(self
            .records
            .read()
            .await
            .get(&order_id)
            .and_then(|record| record.claim_id.clone()))
    }

    async fn save_claim(
        &self,
        order_id: OrderId,
        claim_id: &ProviderClaimId,
        payload: Option<&OfferPayload>,
    ) -> Result<(), PortError> {
        let mut records = self.records.write().await;
        let record = records.entry(order_id).or_default();
        record.claim_id = Some(claim_id.clone());
        if let Some(payload) = payload {
            record.payload = Some(payload.clone());
        }
        Ok(())
    }

    async fn add_note(&self, order_id: OrderId, note: &str) -> Result<(), PortError> {
        info!(order_id = %order_id, note, "Order note");
        self.records
            .write()
            .await
            .entry(order_id)
            .or_default()
            .notes
            .push(note.to_string());
        Ok(())
    }
}
