use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::settlement_events::{SettlementEvent, WebhookDisposition};

#[async_trait]
#[automock]
pub trait WebhookEventRepository {
    /// Records the event id and applies its ledger effect in one database
    /// transaction. A previously seen event id short-circuits to
    /// `AlreadyProcessed` before any settlement logic runs.
    async fn apply_settlement_event(&self, event: SettlementEvent) -> Result<WebhookDisposition>;
}
