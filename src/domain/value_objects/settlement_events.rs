use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized payment-network event, produced by the webhook transport layer
/// after signature verification. The settlement core trusts this input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementEvent {
    pub external_event_id: String,
    pub booking_id: Uuid,
    pub transfer_id: String,
    pub outcome: TransferOutcome,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    Succeeded,
    Failed,
}

/// What the idempotency gate did with an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookDisposition {
    Applied,
    AlreadyProcessed,
}
