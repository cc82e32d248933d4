use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use showtime_booking::Receipt;
use showtime_shared::BookingId;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings/{id}", get(get_booking))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<BookingId>,
) -> Result<Json<Receipt>, AppError> {
    Ok(Json(state.manager.get_booking(&id).await?))
}
