use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::repositories::webhook_events::WebhookEventRepository;
use crate::domain::value_objects::settlement_events::{SettlementEvent, WebhookDisposition};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WebhookError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, WebhookError>;

/// Deduplicates inbound payment-network events. A retried delivery never
/// re-triggers settlement logic, and the caller still answers success so the
/// network stops retrying. Signature verification happens upstream; this gate
/// trusts its input.
pub struct SettlementWebhookUseCase<W>
where
    W: WebhookEventRepository + Send + Sync + 'static,
{
    webhook_repo: Arc<W>,
}

impl<W> SettlementWebhookUseCase<W>
where
    W: WebhookEventRepository + Send + Sync + 'static,
{
    pub fn new(webhook_repo: Arc<W>) -> Self {
        Self { webhook_repo }
    }

    pub async fn handle(&self, event: SettlementEvent) -> UseCaseResult<WebhookDisposition> {
        if event.external_event_id.trim().is_empty() {
            warn!("webhooks: event without an id");
            return Err(WebhookError::InvalidPayload(
                "event id is required".to_string(),
            ));
        }
        if event.transfer_id.trim().is_empty() {
            warn!(
                event_id = %event.external_event_id,
                "webhooks: event without a transfer id"
            );
            return Err(WebhookError::InvalidPayload(
                "transfer id is required".to_string(),
            ));
        }

        let event_id = event.external_event_id.clone();
        let booking_id = event.booking_id;

        let disposition = self
            .webhook_repo
            .apply_settlement_event(event)
            .await
            .map_err(|err| {
                error!(
                    event_id = %event_id,
                    %booking_id,
                    db_error = ?err,
                    "webhooks: failed to apply settlement event"
                );
                WebhookError::Internal(err)
            })?;

        match disposition {
            WebhookDisposition::Applied => {
                info!(event_id = %event_id, %booking_id, "webhooks: settlement event applied");
            }
            WebhookDisposition::AlreadyProcessed => {
                info!(
                    event_id = %event_id,
                    %booking_id,
                    "webhooks: duplicate delivery ignored"
                );
            }
        }

        Ok(disposition)
    }
}
