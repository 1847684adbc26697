use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;
use uuid::Uuid;

use crate::usecases::payout_release::{
    TransferError, TransferGateway, TransferReceipt, TransferRequest,
};

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_TIMEOUT_SECS: u64 = 10;

/// Minimal Stripe Connect client built on reqwest. Transfers carry the
/// caller's idempotency key as a first-class `Idempotency-Key` header so a
/// transport-level retry never creates a second transfer.
pub struct StripeTransferClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct StripeTransferObject {
    pub id: Option<String>,
    pub metadata: Option<std::collections::HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransferResp {
    id: String,
    created: Option<i64>,
}

impl StripeTransferClient {
    pub fn new(secret_key: String, webhook_secret: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(STRIPE_API_TIMEOUT_SECS))
                .build()
                .expect("failed to build http client"),
            secret_key,
            webhook_secret,
        }
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("invalid webhook signature");
        }

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    pub fn extract_transfer_object(event: &StripeEvent) -> Option<StripeTransferObject> {
        serde_json::from_value(event.data.object.clone()).ok()
    }

    fn ts_to_datetime(ts: Option<i64>) -> DateTime<Utc> {
        ts.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl TransferGateway for StripeTransferClient {
    async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        // Stripe Connect transfers: https://stripe.com/docs/api/transfers/create
        let body = [
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
            ("destination", request.destination_account_id.clone()),
            ("metadata[booking_id]", request.booking_id.to_string()),
            ("metadata[provider_id]", request.provider_id.to_string()),
        ];

        let resp = self
            .http
            .post("https://api.stripe.com/v1/transfers")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("Idempotency-Key", request.idempotency_key.clone())
            .form(&body)
            .send()
            .await
            .map_err(|err| TransferError::Unavailable(err.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let parsed: TransferResp = resp
                .json()
                .await
                .map_err(|err| TransferError::Unavailable(err.to_string()))?;
            return Ok(TransferReceipt {
                transfer_id: parsed.id,
                created_at: Self::ts_to_datetime(parsed.created),
            });
        }

        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body_text = resp.text().await.unwrap_or_default();

        let (stripe_error_type, stripe_error_code, stripe_error_message) =
            match serde_json::from_str::<StripeErrorEnvelope>(&body_text) {
                Ok(envelope) => (
                    envelope.error.type_,
                    envelope.error.code,
                    envelope.error.message,
                ),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?stripe_error_type,
            stripe_error_code = ?stripe_error_code,
            stripe_error_message = ?stripe_error_message,
            booking_id = %request.booking_id,
            "stripe transfer request failed"
        );

        if status.is_server_error() {
            return Err(TransferError::Unavailable(format!(
                "Stripe answered {status} (request_id={request_id:?})"
            )));
        }

        Err(TransferError::Rejected(
            stripe_error_message
                .unwrap_or_else(|| format!("Stripe rejected the transfer with {status}")),
        ))
    }
}

/// Normalized event types this service consumes; everything else is ignored
/// upstream.
pub fn transfer_outcome_for_event(event_type: &str) -> Option<crate::domain::value_objects::settlement_events::TransferOutcome> {
    use crate::domain::value_objects::settlement_events::TransferOutcome;
    match event_type {
        "transfer.paid" => Some(TransferOutcome::Succeeded),
        "transfer.failed" => Some(TransferOutcome::Failed),
        _ => None,
    }
}

/// Builds the normalized settlement event the idempotency gate consumes.
pub fn normalize_settlement_event(
    event: &StripeEvent,
) -> Option<crate::domain::value_objects::settlement_events::SettlementEvent> {
    use crate::domain::value_objects::settlement_events::SettlementEvent;

    let outcome = transfer_outcome_for_event(&event.type_)?;
    let object = StripeTransferClient::extract_transfer_object(event)?;
    let transfer_id = object.id?;
    let booking_id = object
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.get("booking_id"))
        .and_then(|value| Uuid::parse_str(value).ok())?;

    Some(SettlementEvent {
        external_event_id: event.id.clone()?,
        booking_id,
        transfer_id,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::settlement_events::TransferOutcome;
    use serde_json::json;

    fn sample_event(event_type: &str) -> StripeEvent {
        let booking_id = Uuid::new_v4();
        StripeEvent {
            id: Some("evt_1".to_string()),
            type_: event_type.to_string(),
            created: Some(1_700_000_000),
            data: StripeEventData {
                object: json!({
                    "id": "tr_1",
                    "metadata": { "booking_id": booking_id.to_string() },
                }),
            },
        }
    }

    #[test]
    fn normalizes_paid_transfer_events() {
        let event = sample_event("transfer.paid");
        let normalized = normalize_settlement_event(&event).unwrap();
        assert_eq!(normalized.external_event_id, "evt_1");
        assert_eq!(normalized.transfer_id, "tr_1");
        assert_eq!(normalized.outcome, TransferOutcome::Succeeded);
    }

    #[test]
    fn ignores_unrelated_event_types() {
        let event = sample_event("transfer.created");
        assert!(normalize_settlement_event(&event).is_none());
    }

    #[test]
    fn rejects_tampered_signatures() {
        let client =
            StripeTransferClient::new("sk_test_1".to_string(), "whsec_secret".to_string());
        let payload = br#"{"id":"evt_1","type":"transfer.paid","data":{"object":{}}}"#;

        let result = client.verify_webhook_signature(payload, "t=123,v1=deadbeef");
        assert!(result.is_err());
    }

    #[test]
    fn accepts_valid_signatures() {
        let secret = "whsec_secret";
        let client = StripeTransferClient::new("sk_test_1".to_string(), secret.to_string());
        let payload = br#"{"id":"evt_1","type":"transfer.paid","data":{"object":{}}}"#;

        let timestamp = "1700000000";
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let header = format!("t={timestamp},v1={signature}");
        let event = client.verify_webhook_signature(payload, &header).unwrap();
        assert_eq!(event.type_, "transfer.paid");
    }
}
