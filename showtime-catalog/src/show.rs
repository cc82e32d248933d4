use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use showtime_shared::{CityId, ShowId, TheaterId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theater {
    pub id: TheaterId,
    pub name: String,
    pub city_id: CityId,
}

impl Theater {
    pub fn new(id: TheaterId, name: impl Into<String>, city_id: CityId) -> Self {
        Self {
            id,
            name: name.into(),
            city_id,
        }
    }
}

/// A single screening of a movie in a theater.
///
/// This is the show metadata the reservation engine reads from the catalog;
/// it is never mutated by a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Show {
    pub id: ShowId,
    pub movie_name: String,
    pub theater_id: TheaterId,
    pub start_time: DateTime<Utc>,
}

impl Show {
    pub fn new(
        id: ShowId,
        movie_name: impl Into<String>,
        theater_id: TheaterId,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            movie_name: movie_name.into(),
            theater_id,
            start_time,
        }
    }

    /// Calendar date of the screening (UTC)
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// Saturday and Sunday screenings
    pub fn is_weekend(&self) -> bool {
        matches!(self.start_time.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
