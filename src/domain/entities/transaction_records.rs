use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transaction_records;

/// One ledger row per attempted settlement action on a booking. At most one
/// record per booking ever reaches `completed` with a transfer id; that is
/// the anti-duplication guarantee the release engine relies on.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transaction_records)]
pub struct TransactionRecordEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub currency: String,
    pub amount_minor: i64,
    pub platform_fee_minor: i64,
    pub provider_payout_minor: i64,
    pub status: String,
    pub external_transfer_id: Option<String>,
    pub idempotency_key: String,
    pub error: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transaction_records)]
pub struct InsertTransactionRecordEntity {
    pub booking_id: Uuid,
    pub currency: String,
    pub amount_minor: i64,
    pub platform_fee_minor: i64,
    pub provider_payout_minor: i64,
    pub status: String,
    pub idempotency_key: String,
}
