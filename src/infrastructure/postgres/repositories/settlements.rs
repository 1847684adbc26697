use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::bookings::BookingEntity;
use crate::domain::entities::payout_schedules::{
    InsertPayoutScheduleEntity, PayoutScheduleEntity,
};
use crate::domain::entities::transaction_records::{
    InsertTransactionRecordEntity, TransactionRecordEntity,
};
use crate::domain::repositories::settlements::{ReleaseClaim, SettlementRepository};
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
use crate::domain::value_objects::enums::payout_schedule_statuses::PayoutScheduleStatus;
use crate::domain::value_objects::enums::transaction_statuses::TransactionStatus;
use crate::infrastructure::postgres::postgres_connection::{PgPoolSquad, with_transaction};
use crate::infrastructure::postgres::schema::{bookings, payout_schedules, transaction_records};

pub struct SettlementPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SettlementPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SettlementRepository for SettlementPostgres {
    async fn find_record_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<TransactionRecordEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transaction_records::table
            .filter(transaction_records::booking_id.eq(booking_id))
            .order(transaction_records::created_at.desc())
            .select(TransactionRecordEntity::as_select())
            .first::<TransactionRecordEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn claim_release(
        &self,
        booking_id: Uuid,
        candidate: InsertTransactionRecordEntity,
    ) -> Result<ReleaseClaim> {
        with_transaction(&self.db_pool, |conn| {
            // The row lock serializes concurrent claims on the same booking;
            // the loser re-reads the winner's committed ledger row.
            bookings::table
                .find(booking_id)
                .select(BookingEntity::as_select())
                .for_update()
                .first::<BookingEntity>(conn)
                .optional()?
                .ok_or_else(|| anyhow!("booking {} not found while claiming release", booking_id))?;

            let existing = transaction_records::table
                .filter(transaction_records::booking_id.eq(booking_id))
                .order(transaction_records::created_at.desc())
                .select(TransactionRecordEntity::as_select())
                .first::<TransactionRecordEntity>(conn)
                .optional()?;

            if let Some(record) = existing {
                if record.status == TransactionStatus::Completed.to_string()
                    && record.external_transfer_id.is_some()
                {
                    return Ok(ReleaseClaim::AlreadyReleased(record));
                }
                // A live pending attempt keeps its idempotency key, so a
                // retried call is deduplicated by the payment network.
                if record.status == TransactionStatus::Pending.to_string() {
                    return Ok(ReleaseClaim::Claimed(record));
                }
            }

            let record = insert_into(transaction_records::table)
                .values(&candidate)
                .returning(TransactionRecordEntity::as_returning())
                .get_result::<TransactionRecordEntity>(conn)?;

            Ok(ReleaseClaim::Claimed(record))
        })
    }

    async fn complete_release(
        &self,
        record_id: Uuid,
        external_transfer_id: String,
        released_at: DateTime<Utc>,
    ) -> Result<()> {
        with_transaction(&self.db_pool, |conn| {
            let now = Utc::now();

            let booking_id = update(
                transaction_records::table.filter(transaction_records::id.eq(record_id)),
            )
            .set((
                transaction_records::status.eq(TransactionStatus::Completed.to_string()),
                transaction_records::external_transfer_id.eq(Some(external_transfer_id.clone())),
                transaction_records::processed_at.eq(Some(released_at)),
                transaction_records::updated_at.eq(now),
            ))
            .returning(transaction_records::booking_id)
            .get_result::<Uuid>(conn)?;

            update(bookings::table.filter(bookings::id.eq(booking_id)))
                .set((
                    bookings::payment_status.eq(PaymentStatus::Released.to_string()),
                    bookings::payment_ref.eq(Some(external_transfer_id.clone())),
                    bookings::updated_at.eq(now),
                ))
                .execute(conn)?;

            update(
                payout_schedules::table
                    .filter(payout_schedules::booking_id.eq(booking_id))
                    .filter(
                        payout_schedules::status.eq(PayoutScheduleStatus::Scheduled.to_string()),
                    ),
            )
            .set((
                payout_schedules::status.eq(PayoutScheduleStatus::Completed.to_string()),
                payout_schedules::updated_at.eq(now),
            ))
            .execute(conn)?;

            Ok(())
        })
    }

    async fn mark_release_failed(&self, record_id: Uuid, reason: String) -> Result<()> {
        with_transaction(&self.db_pool, |conn| {
            let now = Utc::now();

            let booking_id = update(
                transaction_records::table.filter(transaction_records::id.eq(record_id)),
            )
            .set((
                transaction_records::status.eq(TransactionStatus::Failed.to_string()),
                transaction_records::error.eq(Some(reason.clone())),
                transaction_records::updated_at.eq(now),
            ))
            .returning(transaction_records::booking_id)
            .get_result::<Uuid>(conn)?;

            update(bookings::table.filter(bookings::id.eq(booking_id)))
                .set((
                    bookings::payment_status.eq(PaymentStatus::Failed.to_string()),
                    bookings::updated_at.eq(now),
                ))
                .execute(conn)?;

            update(
                payout_schedules::table
                    .filter(payout_schedules::booking_id.eq(booking_id))
                    .filter(
                        payout_schedules::status.eq(PayoutScheduleStatus::Scheduled.to_string()),
                    ),
            )
            .set((
                payout_schedules::status.eq(PayoutScheduleStatus::Failed.to_string()),
                payout_schedules::updated_at.eq(now),
            ))
            .execute(conn)?;

            Ok(())
        })
    }

    async fn create_schedule(
        &self,
        insert_schedule_entity: InsertPayoutScheduleEntity,
    ) -> Result<PayoutScheduleEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payout_schedules::table)
            .values(&insert_schedule_entity)
            .returning(PayoutScheduleEntity::as_returning())
            .get_result::<PayoutScheduleEntity>(&mut conn)?;

        Ok(result)
    }

    async fn due_schedules(&self, now: DateTime<Utc>) -> Result<Vec<PayoutScheduleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payout_schedules::table
            .filter(payout_schedules::status.eq(PayoutScheduleStatus::Scheduled.to_string()))
            .filter(payout_schedules::scheduled_for.le(now))
            .select(PayoutScheduleEntity::as_select())
            .order(payout_schedules::scheduled_for.asc())
            .load::<PayoutScheduleEntity>(&mut conn)?;

        Ok(result)
    }

    async fn close_schedule_for_booking(
        &self,
        booking_id: Uuid,
        status: PayoutScheduleStatus,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        update(
            payout_schedules::table
                .filter(payout_schedules::booking_id.eq(booking_id))
                .filter(payout_schedules::status.eq(PayoutScheduleStatus::Scheduled.to_string())),
        )
        .set((
            payout_schedules::status.eq(status.to_string()),
            payout_schedules::updated_at.eq(now),
        ))
        .execute(&mut conn)?;

        Ok(())
    }
}
