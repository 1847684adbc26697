use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::bookings::{BookingEntity, InsertBookingEntity};
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;

#[async_trait]
#[automock]
pub trait BookingRepository {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity>;

    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>>;

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        completed_at: Option<DateTime<Utc>>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Result<BookingEntity>;

    /// Completed bookings of a provider that have no completed transfer yet
    /// and whose completion happened at or before `completed_before`.
    async fn list_releasable_for_provider(
        &self,
        provider_id: Uuid,
        completed_before: DateTime<Utc>,
    ) -> Result<Vec<BookingEntity>>;

    async fn list_completed_for_provider(&self, provider_id: Uuid) -> Result<Vec<BookingEntity>>;

    async fn list_completed(&self) -> Result<Vec<BookingEntity>>;
}
