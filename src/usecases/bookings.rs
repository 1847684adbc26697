use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::bookings::InsertBookingEntity;
use crate::domain::entities::payout_schedules::InsertPayoutScheduleEntity;
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::providers::ProviderRepository;
use crate::domain::repositories::settlements::SettlementRepository;
use crate::domain::value_objects::actors::Actor;
use crate::domain::value_objects::bookings::{BookingDto, CreateBookingModel};
use crate::domain::value_objects::enums::actor_roles::ActorRole;
use crate::domain::value_objects::enums::booking_statuses::{
    BookingStatus, InvalidTransition, TransitionOutcome,
};
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
use crate::domain::value_objects::enums::payout_schedule_statuses::PayoutScheduleStatus;
use crate::domain::value_objects::fees::{FeeError, compute_fees};
use crate::domain::value_objects::money::{Money, MoneyError};
use crate::domain::value_objects::time_slots::{TimeSlot, TimeSlotError};
use crate::usecases::payout_release::HOLD_PERIOD_HOURS;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    InvalidMoney(#[from] MoneyError),
    #[error(transparent)]
    InvalidTimeSlot(#[from] TimeSlotError),
    #[error(transparent)]
    InvalidFees(#[from] FeeError),
    #[error("provider not found")]
    ProviderNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("actor is not allowed to update this booking")]
    NotAuthorized,
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BookingError::InvalidMoney(_)
            | BookingError::InvalidTimeSlot(_)
            | BookingError::InvalidFees(_)
            | BookingError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            BookingError::ProviderNotFound | BookingError::BookingNotFound => {
                StatusCode::NOT_FOUND
            }
            BookingError::NotAuthorized => StatusCode::FORBIDDEN,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, BookingError>;

/// Checkout and lifecycle glue around the settlement core: stamps fees at
/// creation time, runs the state machine on updates, and schedules the payout
/// when a booking completes.
pub struct BookingUseCase<B, P, S>
where
    B: BookingRepository + Send + Sync + 'static,
    P: ProviderRepository + Send + Sync + 'static,
    S: SettlementRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    provider_repo: Arc<P>,
    settlement_repo: Arc<S>,
}

impl<B, P, S> BookingUseCase<B, P, S>
where
    B: BookingRepository + Send + Sync + 'static,
    P: ProviderRepository + Send + Sync + 'static,
    S: SettlementRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>, provider_repo: Arc<P>, settlement_repo: Arc<S>) -> Self {
        Self {
            booking_repo,
            provider_repo,
            settlement_repo,
        }
    }

    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        model: CreateBookingModel,
    ) -> UseCaseResult<BookingDto> {
        let slot = TimeSlot::new(model.starts_at, model.ends_at)?;
        let base_price = Money::new(model.base_price, &model.currency)?;

        self.provider_repo
            .find_by_id(model.provider_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::ProviderNotFound)?;

        let fees = compute_fees(base_price.amount_minor(), model.is_guest_booking)?;

        let booking = self
            .booking_repo
            .create(InsertBookingEntity {
                customer_id,
                provider_id: model.provider_id,
                service_name: model.service_name,
                currency: base_price.currency().to_string(),
                base_price_minor: base_price.amount_minor(),
                platform_fee_minor: fees.platform_fee_minor,
                guest_surcharge_minor: fees.guest_surcharge_minor,
                provider_payout_minor: fees.provider_payout_minor,
                total_amount_minor: fees.customer_total_minor,
                status: BookingStatus::Initiated.to_string(),
                payment_status: PaymentStatus::Pending.to_string(),
                is_guest_booking: model.is_guest_booking,
                scheduled_start: slot.starts_at(),
                scheduled_end: slot.ends_at(),
            })
            .await
            .map_err(BookingError::Internal)?;

        info!(
            booking_id = %booking.id,
            %customer_id,
            provider_id = %booking.provider_id,
            base_price_minor = booking.base_price_minor,
            total_amount_minor = booking.total_amount_minor,
            is_guest = booking.is_guest_booking,
            "bookings: booking created"
        );

        Ok(BookingDto::from(booking))
    }

    pub async fn update_status(
        &self,
        booking_id: Uuid,
        actor: &Actor,
        next: BookingStatus,
    ) -> UseCaseResult<BookingDto> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(BookingError::Internal)?
            .ok_or(BookingError::BookingNotFound)?;

        let allowed = actor.is_admin()
            || (actor.role == ActorRole::Provider && actor.id == booking.provider_id);
        if !allowed {
            warn!(
                %booking_id,
                actor_id = %actor.id,
                "bookings: actor is not allowed to update booking status"
            );
            return Err(BookingError::NotAuthorized);
        }

        let current = BookingStatus::from_str(&booking.status)
            .ok_or_else(|| anyhow::anyhow!("unknown booking status: {}", booking.status))?;

        if current.transition_to(next)? == TransitionOutcome::NoOp {
            info!(%booking_id, status = %next, "bookings: status unchanged");
            return Ok(BookingDto::from(booking));
        }

        let now = Utc::now();
        let completed_at = (next == BookingStatus::Completed).then_some(now);
        let cancelled_at = matches!(
            next,
            BookingStatus::Cancelled | BookingStatus::NoShow
        )
        .then_some(now);

        let updated = self
            .booking_repo
            .update_status(booking_id, next, completed_at, cancelled_at)
            .await
            .map_err(BookingError::Internal)?;

        info!(
            %booking_id,
            from = %current,
            to = %next,
            "bookings: status updated"
        );

        if let Some(completed_at) = completed_at {
            self.settlement_repo
                .create_schedule(InsertPayoutScheduleEntity {
                    booking_id,
                    provider_id: updated.provider_id,
                    currency: updated.currency.clone(),
                    amount_minor: updated.provider_payout_minor,
                    scheduled_for: completed_at + Duration::hours(HOLD_PERIOD_HOURS),
                    status: PayoutScheduleStatus::Scheduled.to_string(),
                })
                .await
                .map_err(BookingError::Internal)?;

            info!(
                %booking_id,
                provider_id = %updated.provider_id,
                amount_minor = updated.provider_payout_minor,
                "bookings: payout scheduled"
            );
        }

        Ok(BookingDto::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::bookings::BookingEntity;
    use crate::domain::entities::payout_schedules::PayoutScheduleEntity;
    use crate::domain::entities::providers::ProviderEntity;
    use crate::domain::repositories::bookings::MockBookingRepository;
    use crate::domain::repositories::providers::MockProviderRepository;
    use crate::domain::repositories::settlements::MockSettlementRepository;
    use chrono::DateTime;
    use mockall::predicate::eq;

    fn sample_provider(id: Uuid) -> ProviderEntity {
        let now = Utc::now();
        ProviderEntity {
            id,
            display_name: "Spotless Ltd".to_string(),
            connected_account_id: Some("acct_123".to_string()),
            payout_account_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn entity_from_insert(insert: InsertBookingEntity) -> BookingEntity {
        let now = Utc::now();
        BookingEntity {
            id: Uuid::new_v4(),
            customer_id: insert.customer_id,
            provider_id: insert.provider_id,
            service_name: insert.service_name,
            currency: insert.currency,
            base_price_minor: insert.base_price_minor,
            platform_fee_minor: insert.platform_fee_minor,
            guest_surcharge_minor: insert.guest_surcharge_minor,
            provider_payout_minor: insert.provider_payout_minor,
            total_amount_minor: insert.total_amount_minor,
            status: insert.status,
            payment_status: insert.payment_status,
            is_guest_booking: insert.is_guest_booking,
            scheduled_start: insert.scheduled_start,
            scheduled_end: insert.scheduled_end,
            completed_at: None,
            cancelled_at: None,
            payment_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_booking(provider_id: Uuid, status: BookingStatus) -> BookingEntity {
        let now = Utc::now();
        BookingEntity {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            provider_id,
            service_name: "Garden makeover".to_string(),
            currency: "usd".to_string(),
            base_price_minor: 10_000,
            platform_fee_minor: 1_000,
            guest_surcharge_minor: 0,
            provider_payout_minor: 9_000,
            total_amount_minor: 10_000,
            status: status.to_string(),
            payment_status: PaymentStatus::Paid.to_string(),
            is_guest_booking: false,
            scheduled_start: now - Duration::hours(3),
            scheduled_end: now - Duration::hours(2),
            completed_at: None,
            cancelled_at: None,
            payment_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_model(provider_id: Uuid, is_guest: bool) -> CreateBookingModel {
        let starts_at = Utc::now() + Duration::days(1);
        CreateBookingModel {
            provider_id,
            service_name: "Garden makeover".to_string(),
            base_price: 100.0,
            currency: "usd".to_string(),
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            is_guest_booking: is_guest,
        }
    }

    #[tokio::test]
    async fn checkout_stamps_guest_fees() {
        let provider_id = Uuid::new_v4();

        let mut booking_repo = MockBookingRepository::new();
        let mut provider_repo = MockProviderRepository::new();
        let settlement_repo = MockSettlementRepository::new();

        provider_repo
            .expect_find_by_id()
            .with(eq(provider_id))
            .returning(move |id| {
                let provider = sample_provider(id);
                Box::pin(async move { Ok(Some(provider)) })
            });
        booking_repo
            .expect_create()
            .withf(|insert| {
                insert.base_price_minor == 10_000
                    && insert.platform_fee_minor == 1_000
                    && insert.guest_surcharge_minor == 1_000
                    && insert.provider_payout_minor == 9_000
                    && insert.total_amount_minor == 11_000
                    && insert.status == "initiated"
            })
            .times(1)
            .returning(|insert| {
                let entity = entity_from_insert(insert);
                Box::pin(async move { Ok(entity) })
            });

        let usecase = BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(provider_repo),
            Arc::new(settlement_repo),
        );

        let dto = usecase
            .create_booking(Uuid::new_v4(), create_model(provider_id, true))
            .await
            .unwrap();

        assert_eq!(
            dto.platform_fee_minor + dto.guest_surcharge_minor + dto.provider_payout_minor,
            dto.total_amount_minor
        );
    }

    #[tokio::test]
    async fn checkout_rejects_invalid_time_slot() {
        let booking_repo = MockBookingRepository::new();
        let provider_repo = MockProviderRepository::new();
        let settlement_repo = MockSettlementRepository::new();

        let usecase = BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(provider_repo),
            Arc::new(settlement_repo),
        );

        let mut model = create_model(Uuid::new_v4(), false);
        model.ends_at = model.starts_at;

        let err = usecase
            .create_booking(Uuid::new_v4(), model)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTimeSlot(_)));
    }

    #[tokio::test]
    async fn completing_a_booking_schedules_the_payout() {
        let provider_id = Uuid::new_v4();
        let booking = sample_booking(provider_id, BookingStatus::InProgress);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let provider_repo = MockProviderRepository::new();
        let mut settlement_repo = MockSettlementRepository::new();

        let loaded = booking.clone();
        booking_repo
            .expect_find_by_id()
            .with(eq(booking_id))
            .returning(move |_| {
                let booking = loaded.clone();
                Box::pin(async move { Ok(Some(booking)) })
            });
        booking_repo
            .expect_update_status()
            .withf(|_, status, completed_at, cancelled_at| {
                *status == BookingStatus::Completed
                    && completed_at.is_some()
                    && cancelled_at.is_none()
            })
            .times(1)
            .returning(move |id, status, completed_at, _| {
                let mut updated = booking.clone();
                updated.id = id;
                updated.status = status.to_string();
                updated.completed_at = completed_at;
                Box::pin(async move { Ok(updated) })
            });
        settlement_repo
            .expect_create_schedule()
            .withf(move |insert| {
                insert.booking_id == booking_id && insert.amount_minor == 9_000
            })
            .times(1)
            .returning(|insert| {
                let now = Utc::now();
                let entity = PayoutScheduleEntity {
                    id: Uuid::new_v4(),
                    booking_id: insert.booking_id,
                    provider_id: insert.provider_id,
                    currency: insert.currency,
                    amount_minor: insert.amount_minor,
                    scheduled_for: insert.scheduled_for,
                    status: insert.status,
                    created_at: now,
                    updated_at: now,
                };
                Box::pin(async move { Ok(entity) })
            });

        let usecase = BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(provider_repo),
            Arc::new(settlement_repo),
        );

        let actor = Actor::new(provider_id, ActorRole::Provider);
        let dto = usecase
            .update_status(booking_id, &actor, BookingStatus::Completed)
            .await
            .unwrap();

        assert_eq!(dto.status, "completed");
        assert!(dto.completed_at.is_some());
    }

    #[tokio::test]
    async fn cancelled_booking_cannot_complete() {
        let provider_id = Uuid::new_v4();
        let mut booking = sample_booking(provider_id, BookingStatus::Cancelled);
        booking.cancelled_at = Some(Utc::now());
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let provider_repo = MockProviderRepository::new();
        let settlement_repo = MockSettlementRepository::new();

        booking_repo
            .expect_find_by_id()
            .returning(move |_| {
                let booking = booking.clone();
                Box::pin(async move { Ok(Some(booking)) })
            });
        booking_repo.expect_update_status().times(0);

        let usecase = BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(provider_repo),
            Arc::new(settlement_repo),
        );

        let actor = Actor::new(provider_id, ActorRole::Provider);
        let err = usecase
            .update_status(booking_id, &actor, BookingStatus::Completed)
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn repeated_completion_is_a_noop() {
        let provider_id = Uuid::new_v4();
        let mut booking = sample_booking(provider_id, BookingStatus::Completed);
        booking.completed_at = Some(
            DateTime::parse_from_rfc3339("2026-01-10T08:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        let provider_repo = MockProviderRepository::new();
        let mut settlement_repo = MockSettlementRepository::new();

        booking_repo
            .expect_find_by_id()
            .returning(move |_| {
                let booking = booking.clone();
                Box::pin(async move { Ok(Some(booking)) })
            });
        booking_repo.expect_update_status().times(0);
        settlement_repo.expect_create_schedule().times(0);

        let usecase = BookingUseCase::new(
            Arc::new(booking_repo),
            Arc::new(provider_repo),
            Arc::new(settlement_repo),
        );

        let actor = Actor::new(provider_id, ActorRole::Provider);
        let dto = usecase
            .update_status(booking_id, &actor, BookingStatus::Completed)
            .await
            .unwrap();

        assert_eq!(dto.status, "completed");
    }
}
