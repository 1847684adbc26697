use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payout_schedules::{
    InsertPayoutScheduleEntity, PayoutScheduleEntity,
};
use crate::domain::entities::transaction_records::{
    InsertTransactionRecordEntity, TransactionRecordEntity,
};
use crate::domain::value_objects::enums::payout_schedule_statuses::PayoutScheduleStatus;

/// Outcome of a row-locked release claim.
#[derive(Debug, Clone)]
pub enum ReleaseClaim {
    /// A pending ledger row now owns this attempt; its idempotency key is the
    /// one to present to the payment network.
    Claimed(TransactionRecordEntity),
    /// A completed transfer already exists for the booking.
    AlreadyReleased(TransactionRecordEntity),
}

#[async_trait]
#[automock]
pub trait SettlementRepository {
    async fn find_record_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<TransactionRecordEntity>>;

    /// Atomically claims the release of one booking: takes a row lock on the
    /// booking, re-checks that no completed transfer exists, and either reuses
    /// the pending ledger row (keeping its idempotency key) or inserts
    /// `candidate` as a fresh pending row.
    async fn claim_release(
        &self,
        booking_id: Uuid,
        candidate: InsertTransactionRecordEntity,
    ) -> Result<ReleaseClaim>;

    /// Marks the claimed row completed with the returned transfer id, stamps
    /// the booking's payout-tracking fields, and closes any open schedule.
    async fn complete_release(
        &self,
        record_id: Uuid,
        external_transfer_id: String,
        released_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Marks the claimed row failed after a definitive rejection, so the next
    /// invocation starts a fresh attempt with a fresh idempotency key.
    async fn mark_release_failed(&self, record_id: Uuid, reason: String) -> Result<()>;

    async fn create_schedule(
        &self,
        insert_schedule_entity: InsertPayoutScheduleEntity,
    ) -> Result<PayoutScheduleEntity>;

    async fn due_schedules(&self, now: DateTime<Utc>) -> Result<Vec<PayoutScheduleEntity>>;

    async fn close_schedule_for_booking(
        &self,
        booking_id: Uuid,
        status: PayoutScheduleStatus,
    ) -> Result<()>;
}
