use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use showtime_booking::Seat;
use showtime_catalog::{City, Show, Theater};
use showtime_shared::{CityId, SeatId, ShowId, TheaterId};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTheaterRequest {
    pub name: String,
    pub city_id: CityId,
}

#[derive(Debug, Deserialize)]
pub struct CreateShowRequest {
    pub movie_name: String,
    pub theater_id: TheaterId,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddSeatsRequest {
    pub seat_ids: Vec<SeatId>,
}

#[derive(Debug, Serialize)]
pub struct AddSeatsResponse {
    pub added: usize,
}

#[derive(Debug, Deserialize)]
pub struct CitySearch {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TheaterSearch {
    #[serde(default)]
    pub name: String,
    pub city_id: CityId,
}

#[derive(Debug, Deserialize)]
pub struct ShowSearch {
    #[serde(default)]
    pub movie: String,
    pub date: NaiveDate,
    /// Narrow to one theater instead of matching by movie
    pub theater_id: Option<TheaterId>,
}

#[derive(Debug, Deserialize)]
pub struct SeatQuery {
    /// Include held and booked seats
    #[serde(default)]
    pub all: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cities", post(create_city).get(search_cities))
        .route("/v1/theaters", post(create_theater).get(search_theaters))
        .route("/v1/shows", post(create_show).get(search_shows))
        .route("/v1/shows/{id}/seats", post(add_seats).get(list_seats))
}

async fn create_city(
    State(state): State<AppState>,
    Json(req): Json<CreateCityRequest>,
) -> Result<(StatusCode, Json<City>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("City name is required".to_string()));
    }
    let city = state.catalog.add_city(req.name.trim()).await;
    Ok((StatusCode::CREATED, Json(city)))
}

async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CitySearch>,
) -> Json<Vec<City>> {
    Json(state.catalog.search_cities(&query.name).await)
}

async fn create_theater(
    State(state): State<AppState>,
    Json(req): Json<CreateTheaterRequest>,
) -> Result<(StatusCode, Json<Theater>), AppError> {
    let theater = state.catalog.add_theater(&req.name, &req.city_id).await?;
    Ok((StatusCode::CREATED, Json(theater)))
}

async fn search_theaters(
    State(state): State<AppState>,
    Query(query): Query<TheaterSearch>,
) -> Json<Vec<Theater>> {
    Json(state.catalog.search_theaters(&query.name, &query.city_id).await)
}

async fn create_show(
    State(state): State<AppState>,
    Json(req): Json<CreateShowRequest>,
) -> Result<(StatusCode, Json<Show>), AppError> {
    let show = state
        .catalog
        .add_show(&req.movie_name, &req.theater_id, req.start_time)
        .await?;
    Ok((StatusCode::CREATED, Json(show)))
}

async fn search_shows(
    State(state): State<AppState>,
    Query(query): Query<ShowSearch>,
) -> Json<Vec<Show>> {
    let shows = match &query.theater_id {
        Some(theater_id) => state.catalog.shows_by_theater(theater_id, query.date).await,
        None => state.catalog.search_shows(&query.movie, query.date).await,
    };
    Json(shows)
}

async fn add_seats(
    State(state): State<AppState>,
    Path(show_id): Path<ShowId>,
    Json(req): Json<AddSeatsRequest>,
) -> Result<(StatusCode, Json<AddSeatsResponse>), AppError> {
    let added = state.manager.add_seats(&show_id, req.seat_ids).await?;
    Ok((StatusCode::CREATED, Json(AddSeatsResponse { added })))
}

async fn list_seats(
    State(state): State<AppState>,
    Path(show_id): Path<ShowId>,
    Query(query): Query<SeatQuery>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let seats = if query.all {
        state.manager.seats(&show_id).await?
    } else {
        state.manager.available_seats(&show_id).await?
    };
    Ok(Json(seats))
}
