use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthActor;
use crate::config::config_model::DotEnvyConfig;
use crate::infrastructure::axum_http::error_responses::{domain_error, plain_error};
use crate::infrastructure::notify::WebhookPayoutNotifier;
use crate::infrastructure::payments::stripe_transfer::StripeTransferClient;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::bookings::BookingPostgres;
use crate::infrastructure::postgres::repositories::providers::ProviderPostgres;
use crate::infrastructure::postgres::repositories::settlements::SettlementPostgres;
use crate::infrastructure::rate_limit::{InMemoryRateLimiter, RateLimiter};
use crate::usecases::payout_release::{PayoutError, PayoutReleaseEngine};

pub type Engine = PayoutReleaseEngine<
    BookingPostgres,
    ProviderPostgres,
    SettlementPostgres,
    StripeTransferClient,
    WebhookPayoutNotifier,
>;

#[derive(Clone)]
pub struct PayoutsRouteState {
    engine: Arc<Engine>,
    rate_limiter: Arc<dyn RateLimiter>,
}

pub fn build_engine(config: &DotEnvyConfig, db_pool: Arc<PgPoolSquad>) -> Engine {
    let booking_repo = BookingPostgres::new(Arc::clone(&db_pool));
    let provider_repo = ProviderPostgres::new(Arc::clone(&db_pool));
    let settlement_repo = SettlementPostgres::new(Arc::clone(&db_pool));
    let transfer_client = StripeTransferClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    );
    let notifier = WebhookPayoutNotifier::new(config.payouts.notify_webhook_url.clone());

    PayoutReleaseEngine::new(
        Arc::new(booking_repo),
        Arc::new(provider_repo),
        Arc::new(settlement_repo),
        Arc::new(transfer_client),
        Arc::new(notifier),
    )
}

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let engine = build_engine(&config, db_pool);
    let rate_limiter =
        InMemoryRateLimiter::per_minute(config.payouts.release_rate_per_minute);

    Router::new().route("/release", post(release)).with_state(PayoutsRouteState {
        engine: Arc::new(engine),
        rate_limiter: Arc::new(rate_limiter),
    })
}

#[derive(Debug, Deserialize)]
pub struct ReleasePayoutRequest {
    pub booking_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub force: Option<bool>,
}

pub async fn release(
    State(state): State<PayoutsRouteState>,
    AuthActor(actor): AuthActor,
    Json(payload): Json<ReleasePayoutRequest>,
) -> Response {
    if !state.rate_limiter.allow(&actor.id.to_string()) {
        return plain_error(
            StatusCode::TOO_MANY_REQUESTS,
            "too many release attempts, slow down".to_string(),
        );
    }

    let force = payload.force.unwrap_or(false);

    match (payload.booking_id, payload.provider_id) {
        (Some(booking_id), None) => {
            match state.engine.release_single(booking_id, &actor, force).await {
                Ok(payout) => (StatusCode::OK, Json(json!({ "payout": payout }))).into_response(),
                Err(err) => payout_error(err),
            }
        }
        (None, Some(provider_id)) => {
            match state
                .engine
                .release_for_provider(provider_id, &actor, force)
                .await
            {
                Ok(batch) => (StatusCode::OK, Json(json!({ "payouts": batch }))).into_response(),
                Err(err) => payout_error(err),
            }
        }
        _ => plain_error(
            StatusCode::BAD_REQUEST,
            "exactly one of booking_id or provider_id is required".to_string(),
        ),
    }
}

fn payout_error(err: PayoutError) -> Response {
    domain_error(err.status_code(), err.error_code(), err.to_string())
}
