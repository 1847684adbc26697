use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::bookings;

/// One purchase of a service. The fee columns are stamped at creation time
/// and never change afterwards except through an explicit refund path; the
/// payout-tracking columns (`payment_status`, `payment_ref`) are the only
/// fields the settlement engine touches after completion.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_name: String,
    pub currency: String,
    pub base_price_minor: i64,
    pub platform_fee_minor: i64,
    pub guest_surcharge_minor: i64,
    pub provider_payout_minor: i64,
    pub total_amount_minor: i64,
    pub status: String,
    pub payment_status: String,
    pub is_guest_booking: bool,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_name: String,
    pub currency: String,
    pub base_price_minor: i64,
    pub platform_fee_minor: i64,
    pub guest_surcharge_minor: i64,
    pub provider_payout_minor: i64,
    pub total_amount_minor: i64,
    pub status: String,
    pub payment_status: String,
    pub is_guest_booking: bool,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
}
