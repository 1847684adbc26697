use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::bookings::BookingEntity;
use crate::domain::entities::providers::ProviderEntity;
use crate::domain::entities::transaction_records::InsertTransactionRecordEntity;
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::providers::ProviderRepository;
use crate::domain::repositories::settlements::{ReleaseClaim, SettlementRepository};
use crate::domain::value_objects::actors::Actor;
use crate::domain::value_objects::enums::actor_roles::ActorRole;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;
use crate::domain::value_objects::enums::payout_schedule_statuses::PayoutScheduleStatus;
use crate::domain::value_objects::enums::transaction_statuses::TransactionStatus;
use crate::domain::value_objects::payouts::{
    BatchPayoutError, BatchPayoutResult, PayoutResult, SweepSummary,
};

/// Mandatory delay between booking completion and fund release.
pub const HOLD_PERIOD_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub destination_account_id: String,
    pub idempotency_key: String,
    pub booking_id: Uuid,
    pub provider_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub transfer_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Error)]
pub enum TransferError {
    /// The payment network answered and said no. The attempt is settled; a
    /// later retry must use a fresh idempotency key scope.
    #[error("transfer rejected by payment network: {0}")]
    Rejected(String),
    /// Transport failure or timeout; the outcome is unknown. The claim and
    /// its idempotency key stay live so a retry is deduplicated remotely.
    #[error("payment network unreachable: {0}")]
    Unavailable(String),
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TransferGateway: Send + Sync {
    async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferError>;
}

/// Fire-and-forget collaborator: implementations log failures and never
/// propagate them into settlement results.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PayoutNotifier: Send + Sync {
    async fn payout_released(&self, payout: PayoutResult);
}

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("booking not found")]
    BookingNotFound,
    #[error("provider not found")]
    ProviderNotFound,
    #[error("actor is not allowed to release this payout")]
    NotAuthorized,
    #[error("only administrators may force a release before the hold period ends")]
    ForceNotAllowed,
    #[error("provider has no verified payout account")]
    ProviderNotOnboarded,
    #[error("booking is not completed")]
    BookingNotCompleted,
    #[error("payout has already been released for this booking")]
    AlreadyReleased,
    #[error("hold period not elapsed: {hours_remaining} hour(s) remaining")]
    HoldNotElapsed { hours_remaining: i64 },
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PayoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PayoutError::BookingNotFound | PayoutError::ProviderNotFound => StatusCode::NOT_FOUND,
            PayoutError::NotAuthorized | PayoutError::ForceNotAllowed => StatusCode::FORBIDDEN,
            PayoutError::ProviderNotOnboarded
            | PayoutError::BookingNotCompleted
            | PayoutError::AlreadyReleased
            | PayoutError::HoldNotElapsed { .. } => StatusCode::BAD_REQUEST,
            PayoutError::Transfer(_) => StatusCode::BAD_GATEWAY,
            PayoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in error responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PayoutError::BookingNotFound => "booking_not_found",
            PayoutError::ProviderNotFound => "provider_not_found",
            PayoutError::NotAuthorized => "not_authorized",
            PayoutError::ForceNotAllowed => "force_not_allowed",
            PayoutError::ProviderNotOnboarded => "provider_not_onboarded",
            PayoutError::BookingNotCompleted => "booking_not_completed",
            PayoutError::AlreadyReleased => "already_released",
            PayoutError::HoldNotElapsed { .. } => "hold_not_elapsed",
            PayoutError::Transfer(_) => "transfer_failed",
            PayoutError::Internal(_) => "internal",
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PayoutError>;

/// Decides payout eligibility, enforces the hold period, claims an
/// idempotency-keyed ledger row, calls the transfer API and reconciles the
/// ledger. Batch variants isolate per-booking failures.
pub struct PayoutReleaseEngine<B, P, S, T, N>
where
    B: BookingRepository + Send + Sync + 'static,
    P: ProviderRepository + Send + Sync + 'static,
    S: SettlementRepository + Send + Sync + 'static,
    T: TransferGateway + Send + Sync + 'static,
    N: PayoutNotifier + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    provider_repo: Arc<P>,
    settlement_repo: Arc<S>,
    transfer_gateway: Arc<T>,
    notifier: Arc<N>,
    hold_period: Duration,
}

impl<B, P, S, T, N> PayoutReleaseEngine<B, P, S, T, N>
where
    B: BookingRepository + Send + Sync + 'static,
    P: ProviderRepository + Send + Sync + 'static,
    S: SettlementRepository + Send + Sync + 'static,
    T: TransferGateway + Send + Sync + 'static,
    N: PayoutNotifier + Send + Sync + 'static,
{
    pub fn new(
        booking_repo: Arc<B>,
        provider_repo: Arc<P>,
        settlement_repo: Arc<S>,
        transfer_gateway: Arc<T>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            booking_repo,
            provider_repo,
            settlement_repo,
            transfer_gateway,
            notifier,
            hold_period: Duration::hours(HOLD_PERIOD_HOURS),
        }
    }

    pub async fn release_single(
        &self,
        booking_id: Uuid,
        actor: &Actor,
        force: bool,
    ) -> UseCaseResult<PayoutResult> {
        info!(
            %booking_id,
            actor_id = %actor.id,
            actor_role = %actor.role,
            force,
            "payouts: release requested"
        );

        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "payouts: failed to load booking");
                PayoutError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%booking_id, "payouts: booking not found");
                PayoutError::BookingNotFound
            })?;

        let provider = self
            .provider_repo
            .find_by_id(booking.provider_id)
            .await
            .map_err(|err| {
                error!(
                    %booking_id,
                    provider_id = %booking.provider_id,
                    db_error = ?err,
                    "payouts: failed to load provider"
                );
                PayoutError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %booking_id,
                    provider_id = %booking.provider_id,
                    "payouts: provider not found"
                );
                PayoutError::ProviderNotFound
            })?;

        self.authorize(actor, &booking, force)?;
        let destination_account_id = Self::verified_destination(&provider)?;
        let bypass_hold = force && actor.is_admin();
        self.check_eligibility(&booking, Utc::now(), bypass_hold)?;

        if let Some(record) = self
            .settlement_repo
            .find_record_for_booking(booking_id)
            .await
            .map_err(PayoutError::Internal)?
        {
            if record.status == TransactionStatus::Completed.to_string()
                && record.external_transfer_id.is_some()
            {
                warn!(
                    %booking_id,
                    transaction_id = %record.id,
                    "payouts: transfer already released"
                );
                return Err(PayoutError::AlreadyReleased);
            }
        }

        // The salt makes keys from distinct attempts unique; the claim below
        // hands back the stored key when a pending attempt is still live.
        let candidate = InsertTransactionRecordEntity {
            booking_id,
            currency: booking.currency.clone(),
            amount_minor: booking.total_amount_minor,
            platform_fee_minor: booking.platform_fee_minor,
            provider_payout_minor: booking.provider_payout_minor,
            status: TransactionStatus::Pending.to_string(),
            idempotency_key: format!("transfer-{}-{}", booking_id, Uuid::new_v4()),
        };

        let record = match self
            .settlement_repo
            .claim_release(booking_id, candidate)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "payouts: failed to claim release");
                PayoutError::Internal(err)
            })? {
            ReleaseClaim::AlreadyReleased(record) => {
                warn!(
                    %booking_id,
                    transaction_id = %record.id,
                    "payouts: lost release race, transfer already completed"
                );
                return Err(PayoutError::AlreadyReleased);
            }
            ReleaseClaim::Claimed(record) => record,
        };

        debug!(
            %booking_id,
            transaction_id = %record.id,
            idempotency_key = %record.idempotency_key,
            "payouts: release claimed"
        );

        let receipt = match self
            .transfer_gateway
            .create_transfer(TransferRequest {
                amount_minor: booking.provider_payout_minor,
                currency: booking.currency.clone(),
                destination_account_id,
                idempotency_key: record.idempotency_key.clone(),
                booking_id,
                provider_id: booking.provider_id,
            })
            .await
        {
            Ok(receipt) => receipt,
            Err(TransferError::Rejected(reason)) => {
                error!(
                    %booking_id,
                    transaction_id = %record.id,
                    reason = %reason,
                    "payouts: transfer rejected, closing attempt"
                );
                self.settlement_repo
                    .mark_release_failed(record.id, reason.clone())
                    .await
                    .map_err(PayoutError::Internal)?;
                return Err(PayoutError::Transfer(TransferError::Rejected(reason)));
            }
            Err(err @ TransferError::Unavailable(_)) => {
                error!(
                    %booking_id,
                    transaction_id = %record.id,
                    error = %err,
                    "payouts: transfer outcome unknown, leaving claim pending"
                );
                return Err(PayoutError::Transfer(err));
            }
        };

        let released_at = Utc::now();
        self.settlement_repo
            .complete_release(record.id, receipt.transfer_id.clone(), released_at)
            .await
            .map_err(|err| {
                error!(
                    %booking_id,
                    transaction_id = %record.id,
                    transfer_id = %receipt.transfer_id,
                    db_error = ?err,
                    "payouts: transfer succeeded but ledger completion failed"
                );
                PayoutError::Internal(err)
            })?;

        let payout = PayoutResult {
            booking_id,
            transaction_id: record.id,
            external_transfer_id: receipt.transfer_id,
            amount_minor: booking.provider_payout_minor,
            currency: booking.currency.clone(),
            released_at,
        };

        info!(
            %booking_id,
            transaction_id = %payout.transaction_id,
            transfer_id = %payout.external_transfer_id,
            amount_minor = payout.amount_minor,
            "payouts: release completed"
        );

        self.notifier.payout_released(payout.clone()).await;

        Ok(payout)
    }

    /// Releases every eligible booking of one provider. A failing booking is
    /// recorded in the error list and never aborts the rest of the batch.
    pub async fn release_for_provider(
        &self,
        provider_id: Uuid,
        actor: &Actor,
        force: bool,
    ) -> UseCaseResult<BatchPayoutResult> {
        let allowed = actor.is_admin()
            || (actor.role == ActorRole::Provider && actor.id == provider_id);
        if !allowed {
            warn!(
                %provider_id,
                actor_id = %actor.id,
                "payouts: actor is not allowed to run a provider batch"
            );
            return Err(PayoutError::NotAuthorized);
        }
        if force && !actor.is_admin() {
            return Err(PayoutError::ForceNotAllowed);
        }

        let cutoff = if force {
            Utc::now()
        } else {
            Utc::now() - self.hold_period
        };
        let bookings = self
            .booking_repo
            .list_releasable_for_provider(provider_id, cutoff)
            .await
            .map_err(|err| {
                error!(
                    %provider_id,
                    db_error = ?err,
                    "payouts: failed to list releasable bookings"
                );
                PayoutError::Internal(err)
            })?;

        info!(
            %provider_id,
            eligible = bookings.len(),
            force,
            "payouts: starting provider batch release"
        );

        let mut result = BatchPayoutResult::default();
        for booking in bookings {
            match self.release_single(booking.id, actor, force).await {
                Ok(payout) => {
                    result.total_amount_minor += payout.amount_minor;
                    result.released.push(payout);
                }
                Err(err) => {
                    warn!(
                        booking_id = %booking.id,
                        error = %err,
                        "payouts: batch item failed, continuing"
                    );
                    result.errors.push(BatchPayoutError {
                        booking_id: booking.id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        result.failed_count = result.errors.len();

        info!(
            %provider_id,
            released = result.released.len(),
            failed = result.failed_count,
            total_amount_minor = result.total_amount_minor,
            "payouts: provider batch release finished"
        );

        Ok(result)
    }

    /// System-triggered sweep across all due payout schedules. Already
    /// released bookings close their schedule silently; transient failures
    /// leave the schedule open for the next cycle.
    pub async fn release_all_eligible(&self) -> UseCaseResult<SweepSummary> {
        let system = Actor::system();
        let due = self
            .settlement_repo
            .due_schedules(Utc::now())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "payouts: failed to load due schedules");
                PayoutError::Internal(err)
            })?;

        info!(due = due.len(), "payouts: sweep started");

        let mut summary = SweepSummary::default();
        for schedule in due {
            match self.release_single(schedule.booking_id, &system, false).await {
                Ok(payout) => {
                    summary.processed += 1;
                    summary.total_amount_minor += payout.amount_minor;
                }
                Err(PayoutError::AlreadyReleased) => {
                    debug!(
                        booking_id = %schedule.booking_id,
                        "payouts: sweep found schedule for an already released booking"
                    );
                    if let Err(err) = self
                        .settlement_repo
                        .close_schedule_for_booking(
                            schedule.booking_id,
                            PayoutScheduleStatus::Completed,
                        )
                        .await
                    {
                        error!(
                            booking_id = %schedule.booking_id,
                            db_error = ?err,
                            "payouts: failed to close stale schedule"
                        );
                        summary.failed += 1;
                    }
                }
                Err(err) => {
                    warn!(
                        booking_id = %schedule.booking_id,
                        error = %err,
                        "payouts: sweep item failed, will retry next cycle"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            total_amount_minor = summary.total_amount_minor,
            "payouts: sweep finished"
        );

        Ok(summary)
    }

    fn authorize(
        &self,
        actor: &Actor,
        booking: &BookingEntity,
        force: bool,
    ) -> UseCaseResult<()> {
        match actor.role {
            ActorRole::Admin => Ok(()),
            ActorRole::Provider if actor.id == booking.provider_id => {
                if force {
                    warn!(
                        booking_id = %booking.id,
                        actor_id = %actor.id,
                        "payouts: provider attempted to force a release"
                    );
                    Err(PayoutError::ForceNotAllowed)
                } else {
                    Ok(())
                }
            }
            _ => {
                warn!(
                    booking_id = %booking.id,
                    actor_id = %actor.id,
                    actor_role = %actor.role,
                    "payouts: actor is not allowed to release this booking"
                );
                Err(PayoutError::NotAuthorized)
            }
        }
    }

    fn verified_destination(provider: &ProviderEntity) -> UseCaseResult<String> {
        match provider.connected_account_id.as_ref() {
            Some(account) if provider.payout_account_verified => Ok(account.clone()),
            _ => {
                warn!(
                    provider_id = %provider.id,
                    verified = provider.payout_account_verified,
                    "payouts: provider payout account is missing or unverified"
                );
                Err(PayoutError::ProviderNotOnboarded)
            }
        }
    }

    fn check_eligibility(
        &self,
        booking: &BookingEntity,
        now: DateTime<Utc>,
        bypass_hold: bool,
    ) -> UseCaseResult<()> {
        let status = BookingStatus::from_str(&booking.status)
            .ok_or_else(|| anyhow::anyhow!("unknown booking status: {}", booking.status))?;
        if !status.is_payout_eligible() {
            warn!(
                booking_id = %booking.id,
                status = %booking.status,
                "payouts: booking is not completed"
            );
            return Err(PayoutError::BookingNotCompleted);
        }

        // The hold is anchored strictly on completed_at; a completed booking
        // without it is a data-integrity failure, not a fallback case.
        let completed_at = booking.completed_at.ok_or_else(|| {
            anyhow::anyhow!("booking {} is completed but has no completion timestamp", booking.id)
        })?;

        if !bypass_hold {
            let eligible_at = completed_at + self.hold_period;
            if now < eligible_at {
                let remaining = eligible_at - now;
                let hours_remaining = (remaining.num_milliseconds() + 3_599_999) / 3_600_000;
                debug!(
                    booking_id = %booking.id,
                    hours_remaining,
                    "payouts: hold period not elapsed"
                );
                return Err(PayoutError::HoldNotElapsed { hours_remaining });
            }
        }

        Ok(())
    }
}
