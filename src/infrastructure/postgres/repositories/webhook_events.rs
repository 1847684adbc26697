use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};

use crate::domain::entities::processed_webhook_events::InsertProcessedWebhookEventEntity;
use crate::domain::entities::transaction_records::TransactionRecordEntity;
use crate::domain::repositories::webhook_events::WebhookEventRepository;
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
use crate::domain::value_objects::enums::payout_schedule_statuses::PayoutScheduleStatus;
use crate::domain::value_objects::enums::transaction_statuses::TransactionStatus;
use crate::domain::value_objects::settlement_events::{
    SettlementEvent, TransferOutcome, WebhookDisposition,
};
use crate::infrastructure::postgres::postgres_connection::{PgPoolSquad, with_transaction};
use crate::infrastructure::postgres::schema::{
    bookings, payout_schedules, processed_webhook_events, transaction_records,
};

pub struct WebhookEventPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WebhookEventPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WebhookEventRepository for WebhookEventPostgres {
    async fn apply_settlement_event(&self, event: SettlementEvent) -> Result<WebhookDisposition> {
        with_transaction(&self.db_pool, move |conn| {
            // The dedup row and the ledger effect commit together: a crash in
            // between can neither lose the event nor apply it twice.
            let inserted = insert_into(processed_webhook_events::table)
                .values(&InsertProcessedWebhookEventEntity {
                    external_event_id: event.external_event_id.clone(),
                    processed_at: Utc::now(),
                })
                .on_conflict_do_nothing()
                .execute(conn)?;

            if inserted == 0 {
                return Ok(WebhookDisposition::AlreadyProcessed);
            }

            let record = transaction_records::table
                .filter(transaction_records::booking_id.eq(event.booking_id))
                .order(transaction_records::created_at.desc())
                .select(TransactionRecordEntity::as_select())
                .first::<TransactionRecordEntity>(conn)
                .optional()?
                .ok_or_else(|| {
                    anyhow!("no transaction record for booking {}", event.booking_id)
                })?;

            let now = Utc::now();
            match event.outcome {
                TransferOutcome::Succeeded => {
                    update(
                        transaction_records::table
                            .filter(transaction_records::id.eq(record.id)),
                    )
                    .set((
                        transaction_records::status
                            .eq(TransactionStatus::Completed.to_string()),
                        transaction_records::external_transfer_id
                            .eq(Some(event.transfer_id.clone())),
                        transaction_records::processed_at.eq(Some(now)),
                        transaction_records::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                    update(bookings::table.filter(bookings::id.eq(event.booking_id)))
                        .set((
                            bookings::payment_status.eq(PaymentStatus::Released.to_string()),
                            bookings::payment_ref.eq(Some(event.transfer_id.clone())),
                            bookings::updated_at.eq(now),
                        ))
                        .execute(conn)?;

                    update(
                        payout_schedules::table
                            .filter(payout_schedules::booking_id.eq(event.booking_id))
                            .filter(
                                payout_schedules::status
                                    .eq(PayoutScheduleStatus::Scheduled.to_string()),
                            ),
                    )
                    .set((
                        payout_schedules::status
                            .eq(PayoutScheduleStatus::Completed.to_string()),
                        payout_schedules::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                }
                TransferOutcome::Failed => {
                    update(
                        transaction_records::table
                            .filter(transaction_records::id.eq(record.id)),
                    )
                    .set((
                        transaction_records::status.eq(TransactionStatus::Failed.to_string()),
                        transaction_records::error
                            .eq(Some("transfer failed at payment network".to_string())),
                        transaction_records::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                    update(bookings::table.filter(bookings::id.eq(event.booking_id)))
                        .set((
                            bookings::payment_status.eq(PaymentStatus::Failed.to_string()),
                            bookings::updated_at.eq(now),
                        ))
                        .execute(conn)?;

                    update(
                        payout_schedules::table
                            .filter(payout_schedules::booking_id.eq(event.booking_id))
                            .filter(
                                payout_schedules::status
                                    .eq(PayoutScheduleStatus::Scheduled.to_string()),
                            ),
                    )
                    .set((
                        payout_schedules::status.eq(PayoutScheduleStatus::Failed.to_string()),
                        payout_schedules::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                }
            }

            Ok(WebhookDisposition::Applied)
        })
    }
}
