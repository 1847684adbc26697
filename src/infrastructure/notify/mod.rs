use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::value_objects::payouts::PayoutResult;
use crate::usecases::payout_release::PayoutNotifier;

/// Fire-and-forget payout notification over an outbound webhook. Delivery
/// failures are logged and swallowed; settlement results never depend on them.
pub struct WebhookPayoutNotifier {
    http: reqwest::Client,
    webhook_url: Option<Url>,
}

impl WebhookPayoutNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let webhook_url = webhook_url.and_then(|raw| match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(err) => {
                // Do not log the raw URL (notify URLs may embed secrets).
                warn!(
                    parse_error = %err,
                    "PAYOUT_NOTIFY_WEBHOOK_URL is invalid; payout notifications disabled"
                );
                None
            }
        });

        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(3))
                .build()
                .expect("reqwest client must build"),
            webhook_url,
        }
    }
}

#[async_trait]
impl PayoutNotifier for WebhookPayoutNotifier {
    async fn payout_released(&self, payout: PayoutResult) {
        let Some(url) = self.webhook_url.as_ref() else {
            debug!(
                booking_id = %payout.booking_id,
                "payout notification skipped, no webhook configured"
            );
            return;
        };

        let body = json!({
            "event": "payout.released",
            "booking_id": payout.booking_id,
            "transfer_id": payout.external_transfer_id,
            "amount_minor": payout.amount_minor,
            "currency": payout.currency,
            "released_at": payout.released_at,
        });

        match self.http.post(url.clone()).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(booking_id = %payout.booking_id, "payout notification delivered");
            }
            Ok(resp) => {
                warn!(
                    booking_id = %payout.booking_id,
                    status = %resp.status(),
                    "payout notification rejected"
                );
            }
            Err(err) => {
                warn!(
                    booking_id = %payout.booking_id,
                    error = %err,
                    "payout notification failed"
                );
            }
        }
    }
}
