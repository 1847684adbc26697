use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{exists, not};
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::bookings::{BookingEntity, InsertBookingEntity};
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;
use crate::domain::value_objects::enums::transaction_statuses::TransactionStatus;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{bookings, transaction_records};

pub struct BookingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(bookings::table)
            .values(&insert_booking_entity)
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .find(booking_id)
            .select(BookingEntity::as_select())
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        completed_at: Option<DateTime<Utc>>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = update(bookings::table.filter(bookings::id.eq(booking_id)))
            .set((
                bookings::status.eq(status.to_string()),
                bookings::completed_at.eq(completed_at),
                bookings::cancelled_at.eq(cancelled_at),
                bookings::updated_at.eq(now),
            ))
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_releasable_for_provider(
        &self,
        provider_id: Uuid,
        completed_before: DateTime<Utc>,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let released = transaction_records::table
            .filter(transaction_records::booking_id.eq(bookings::id))
            .filter(transaction_records::status.eq(TransactionStatus::Completed.to_string()))
            .filter(transaction_records::external_transfer_id.is_not_null());

        let result = bookings::table
            .filter(bookings::provider_id.eq(provider_id))
            .filter(bookings::status.eq(BookingStatus::Completed.to_string()))
            .filter(bookings::completed_at.le(completed_before))
            .filter(not(exists(released)))
            .select(BookingEntity::as_select())
            .order(bookings::completed_at.asc())
            .load::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_completed_for_provider(&self, provider_id: Uuid) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::provider_id.eq(provider_id))
            .filter(bookings::status.eq(BookingStatus::Completed.to_string()))
            .select(BookingEntity::as_select())
            .order(bookings::completed_at.asc())
            .load::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_completed(&self) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::status.eq(BookingStatus::Completed.to_string()))
            .select(BookingEntity::as_select())
            .order(bookings::completed_at.asc())
            .load::<BookingEntity>(&mut conn)?;

        Ok(result)
    }
}
