use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payout_schedules;

/// Forward-looking record of a scheduled release, written when a booking
/// completes. The cron sweep drives off due schedules; the authoritative
/// anti-duplication state stays on `transaction_records`.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payout_schedules)]
pub struct PayoutScheduleEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub provider_id: Uuid,
    pub currency: String,
    pub amount_minor: i64,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payout_schedules)]
pub struct InsertPayoutScheduleEntity {
    pub booking_id: Uuid,
    pub provider_id: Uuid,
    pub currency: String,
    pub amount_minor: i64,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
}
