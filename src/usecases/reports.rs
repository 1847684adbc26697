use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::value_objects::actors::Actor;
use crate::domain::value_objects::enums::actor_roles::ActorRole;
use crate::domain::value_objects::fees::{
    BookingFeeLine, PlatformRevenueSummary, ProviderEarningsSummary, calculate_platform_revenue,
    calculate_provider_earnings,
};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("actor is not allowed to view this report")]
    NotAuthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReportError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReportError::NotAuthorized => StatusCode::FORBIDDEN,
            ReportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ReportError>;

/// Read-only reporting over completed bookings. The summaries are derived
/// from the fee calculator, not from ledger state, and are never authoritative.
pub struct ReportsUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
}

impl<B> ReportsUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>) -> Self {
        Self { booking_repo }
    }

    pub async fn provider_earnings(
        &self,
        provider_id: Uuid,
        actor: &Actor,
    ) -> UseCaseResult<ProviderEarningsSummary> {
        let allowed = actor.is_admin()
            || (actor.role == ActorRole::Provider && actor.id == provider_id);
        if !allowed {
            return Err(ReportError::NotAuthorized);
        }

        let bookings = self
            .booking_repo
            .list_completed_for_provider(provider_id)
            .await
            .map_err(|err| {
                error!(
                    %provider_id,
                    db_error = ?err,
                    "reports: failed to load completed bookings"
                );
                ReportError::Internal(err)
            })?;

        let lines: Vec<BookingFeeLine> = bookings
            .iter()
            .map(|booking| BookingFeeLine {
                base_price_minor: booking.base_price_minor,
                is_guest: booking.is_guest_booking,
            })
            .collect();

        let summary = calculate_provider_earnings(&lines)
            .map_err(|err| ReportError::Internal(anyhow::anyhow!(err)))?;

        info!(
            %provider_id,
            booking_count = summary.booking_count,
            total_payout_minor = summary.total_payout_minor,
            "reports: provider earnings computed"
        );

        Ok(summary)
    }

    pub async fn platform_revenue(&self, actor: &Actor) -> UseCaseResult<PlatformRevenueSummary> {
        if !actor.is_admin() {
            return Err(ReportError::NotAuthorized);
        }

        let bookings = self.booking_repo.list_completed().await.map_err(|err| {
            error!(db_error = ?err, "reports: failed to load completed bookings");
            ReportError::Internal(err)
        })?;

        let lines: Vec<BookingFeeLine> = bookings
            .iter()
            .map(|booking| BookingFeeLine {
                base_price_minor: booking.base_price_minor,
                is_guest: booking.is_guest_booking,
            })
            .collect();

        let summary = calculate_platform_revenue(&lines)
            .map_err(|err| ReportError::Internal(anyhow::anyhow!(err)))?;

        info!(
            booking_count = summary.booking_count,
            total_revenue_minor = summary.total_revenue_minor,
            "reports: platform revenue computed"
        );

        Ok(summary)
    }
}
