use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::warn;

use crate::config::config_model::DotEnvyConfig;
use crate::infrastructure::axum_http::error_responses::domain_error;
use crate::infrastructure::axum_http::routers::payouts::{Engine, build_engine};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT/internal/v1/payouts/sweep" \
//     -H "Authorization: Bearer $INTERNAL_SWEEP_TOKEN"

#[derive(Clone)]
pub struct SweepRouteState {
    config: Arc<DotEnvyConfig>,
    engine: Arc<Engine>,
}

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let engine = build_engine(&config, db_pool);

    Router::new().route("/sweep", post(sweep)).with_state(SweepRouteState {
        config,
        engine: Arc::new(engine),
    })
}

pub async fn sweep(State(state): State<SweepRouteState>, headers: HeaderMap) -> Response {
    let expected_token = match state.config.payouts.internal_sweep_token.as_deref() {
        Some(token) => token,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "sweep token is not configured",
            )
                .into_response();
        }
    };

    if let Err(status) = authorize_bearer(&headers, expected_token) {
        return (status, "unauthorized").into_response();
    }

    match state.engine.release_all_eligible().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            warn!(error = %err, "sweep failed");
            domain_error(err.status_code(), err.error_code(), err.to_string())
        }
    }
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token != expected_token {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(())
}
