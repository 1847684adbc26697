use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::config_model::DotEnvyConfig;
use crate::infrastructure::axum_http::error_responses::plain_error;
use crate::infrastructure::payments::stripe_transfer::{
    StripeTransferClient, normalize_settlement_event,
};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::webhook_events::WebhookEventPostgres;
use crate::usecases::settlement_webhook::SettlementWebhookUseCase;

#[derive(Clone)]
pub struct WebhookRouteState {
    stripe_client: Arc<StripeTransferClient>,
    webhook_usecase: Arc<SettlementWebhookUseCase<WebhookEventPostgres>>,
}

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let stripe_client = StripeTransferClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    );
    let webhook_usecase =
        SettlementWebhookUseCase::new(Arc::new(WebhookEventPostgres::new(db_pool)));

    Router::new()
        .route("/stripe", post(stripe_webhook))
        .with_state(WebhookRouteState {
            stripe_client: Arc::new(stripe_client),
            webhook_usecase: Arc::new(webhook_usecase),
        })
}

pub async fn stripe_webhook(
    State(state): State<WebhookRouteState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return plain_error(
            StatusCode::BAD_REQUEST,
            "missing stripe-signature header".to_string(),
        );
    };

    let event = match state.stripe_client.verify_webhook_signature(&body, signature) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "stripe webhook verification failed");
            return plain_error(
                StatusCode::BAD_REQUEST,
                "signature verification failed".to_string(),
            );
        }
    };

    let Some(settlement_event) = normalize_settlement_event(&event) else {
        debug!(event_type = %event.type_, "ignoring unhandled stripe event type");
        return (StatusCode::OK, Json(json!({ "received": true }))).into_response();
    };

    // Duplicates are deliberately a success: the payment network must not be
    // told to retry an event we have already applied.
    match state.webhook_usecase.handle(settlement_event).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(err) => plain_error(err.status_code(), err.to_string()),
    }
}
