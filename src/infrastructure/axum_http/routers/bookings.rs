use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{patch, post},
};
use uuid::Uuid;

use crate::auth::AuthActor;
use crate::domain::value_objects::bookings::{CreateBookingModel, UpdateBookingStatusModel};
use crate::infrastructure::axum_http::error_responses::plain_error;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::bookings::BookingPostgres;
use crate::infrastructure::postgres::repositories::providers::ProviderPostgres;
use crate::infrastructure::postgres::repositories::settlements::SettlementPostgres;
use crate::usecases::bookings::BookingUseCase;

type Bookings = BookingUseCase<BookingPostgres, ProviderPostgres, SettlementPostgres>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let booking_repo = BookingPostgres::new(Arc::clone(&db_pool));
    let provider_repo = ProviderPostgres::new(Arc::clone(&db_pool));
    let settlement_repo = SettlementPostgres::new(Arc::clone(&db_pool));
    let bookings_usecase = BookingUseCase::new(
        Arc::new(booking_repo),
        Arc::new(provider_repo),
        Arc::new(settlement_repo),
    );

    Router::new()
        .route("/", post(create_booking))
        .route("/:booking_id/status", patch(update_status))
        .with_state(Arc::new(bookings_usecase))
}

pub async fn create_booking(
    State(bookings_usecase): State<Arc<Bookings>>,
    AuthActor(actor): AuthActor,
    Json(model): Json<CreateBookingModel>,
) -> Response {
    match bookings_usecase.create_booking(actor.id, model).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => plain_error(err.status_code(), err.to_string()),
    }
}

pub async fn update_status(
    State(bookings_usecase): State<Arc<Bookings>>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<Uuid>,
    Json(model): Json<UpdateBookingStatusModel>,
) -> Response {
    match bookings_usecase
        .update_status(booking_id, &actor, model.status)
        .await
    {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => plain_error(err.status_code(), err.to_string()),
    }
}
