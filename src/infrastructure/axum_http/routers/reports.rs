use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use crate::auth::AuthActor;
use crate::infrastructure::axum_http::error_responses::plain_error;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::bookings::BookingPostgres;
use crate::usecases::reports::ReportsUseCase;

type Reports = ReportsUseCase<BookingPostgres>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let reports_usecase = ReportsUseCase::new(Arc::new(BookingPostgres::new(db_pool)));

    Router::new()
        .route("/providers/:provider_id/earnings", get(provider_earnings))
        .route("/platform/revenue", get(platform_revenue))
        .with_state(Arc::new(reports_usecase))
}

pub async fn provider_earnings(
    State(reports_usecase): State<Arc<Reports>>,
    AuthActor(actor): AuthActor,
    Path(provider_id): Path<Uuid>,
) -> Response {
    match reports_usecase.provider_earnings(provider_id, &actor).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => plain_error(err.status_code(), err.to_string()),
    }
}

pub async fn platform_revenue(
    State(reports_usecase): State<Arc<Reports>>,
    AuthActor(actor): AuthActor,
) -> Response {
    match reports_usecase.platform_revenue(&actor).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => plain_error(err.status_code(), err.to_string()),
    }
}
