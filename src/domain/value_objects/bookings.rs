use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::bookings::BookingEntity;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingModel {
    pub provider_id: Uuid,
    pub service_name: String,
    /// Base price in major units, e.g. 100.0 for $100.00.
    pub base_price: f64,
    pub currency: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_guest_booking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusModel {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDto {
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
}

impl From<BookingEntity> for BookingDto {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            customer_id: entity.customer_id,
            provider_id: entity.provider_id,
            service_name: entity.service_name,
            currency: entity.currency,
            base_price_minor: entity.base_price_minor,
            platform_fee_minor: entity.platform_fee_minor,
            guest_surcharge_minor: entity.guest_surcharge_minor,
            provider_payout_minor: entity.provider_payout_minor,
            total_amount_minor: entity.total_amount_minor,
            status: entity.status,
            payment_status: entity.payment_status,
            is_guest_booking: entity.is_guest_booking,
            scheduled_start: entity.scheduled_start,
            scheduled_end: entity.scheduled_end,
            completed_at: entity.completed_at,
            cancelled_at: entity.cancelled_at,
        }
    }
}
