use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use showtime_booking::{Receipt, Reservation, DEFAULT_RECIPIENT};
use showtime_shared::{ReservationId, SeatId, ShowId};
use std::time::Duration;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub show_id: ShowId,
    pub seat_ids: Vec<SeatId>,
    /// Falls back to the manager's default hold
    pub ttl_seconds: Option<u64>,
    pub recipient: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reservations", post(reserve))
        .route(
            "/v1/reservations/{id}",
            get(get_reservation).delete(cancel_reservation),
        )
        .route("/v1/reservations/{id}/confirm", post(confirm_reservation))
}

async fn reserve(
    State(state): State<AppState>,
    Json(req): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let ttl = match req.ttl_seconds {
        Some(seconds) => Duration::from_secs(seconds),
        None => state.manager.default_ttl(),
    };
    if ttl > state.rules.max_hold_ttl() {
        return Err(AppError::ValidationError(format!(
            "ttl_seconds may not exceed {}",
            state.rules.max_hold_seconds
        )));
    }

    let recipient = req.recipient.as_deref().unwrap_or(DEFAULT_RECIPIENT);
    let reservation = state
        .manager
        .reserve_for(recipient, &req.show_id, &req.seat_ids, ttl)
        .await?;

    info!(reservation_id = %reservation.id, "Reservation created via API");
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(state.manager.get_reservation(&id).await?))
}

async fn confirm_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<Receipt>, AppError> {
    Ok(Json(state.manager.confirm(&id).await?))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<StatusCode, AppError> {
    state.manager.cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
