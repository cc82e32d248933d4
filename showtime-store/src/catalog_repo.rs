use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use showtime_catalog::{City, Show, Theater};
use showtime_core::{CoreError, CoreResult, IdGenerator, ShowCatalog};
use showtime_shared::{CityId, ShowId, TheaterId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory catalog of cities, theaters and shows
pub struct InMemoryCatalog {
    ids: Arc<dyn IdGenerator>,
    cities: RwLock<HashMap<CityId, City>>,
    theaters: RwLock<HashMap<TheaterId, Theater>>,
    shows: RwLock<HashMap<ShowId, Show>>,
}

fn name_matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl InMemoryCatalog {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            cities: RwLock::new(HashMap::new()),
            theaters: RwLock::new(HashMap::new()),
            shows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_city(&self, name: &str) -> City {
        let city = City::new(CityId::new(self.ids.generate_id()), name);
        self.cities.write().await.insert(city.id.clone(), city.clone());
        info!(city_id = %city.id, "City added: {}", city.name);
        city
    }

    /// The city must already exist
    pub async fn add_theater(&self, name: &str, city_id: &CityId) -> CoreResult<Theater> {
        if !self.cities.read().await.contains_key(city_id) {
            return Err(CoreError::ValidationError(format!("unknown city {}", city_id)));
        }

        let theater = Theater::new(TheaterId::new(self.ids.generate_id()), name, city_id.clone());
        self.theaters.write().await.insert(theater.id.clone(), theater.clone());
        info!(theater_id = %theater.id, city_id = %city_id, "Theater added: {}", theater.name);
        Ok(theater)
    }

    /// The theater must already exist
    pub async fn add_show(
        &self,
        movie_name: &str,
        theater_id: &TheaterId,
        start_time: DateTime<Utc>,
    ) -> CoreResult<Show> {
        if !self.theaters.read().await.contains_key(theater_id) {
            return Err(CoreError::ValidationError(format!("unknown theater {}", theater_id)));
        }

        let show = Show::new(
            ShowId::new(self.ids.generate_id()),
            movie_name,
            theater_id.clone(),
            start_time,
        );
        self.shows.write().await.insert(show.id.clone(), show.clone());
        info!(show_id = %show.id, theater_id = %theater_id, "Show added: {} at {}", show.movie_name, show.start_time);
        Ok(show)
    }

    /// Case-insensitive substring match on the city name
    pub async fn search_cities(&self, name: &str) -> Vec<City> {
        let mut results: Vec<City> = self
            .cities
            .read()
            .await
            .values()
            .filter(|c| name_matches(&c.name, name))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));
        results
    }

    /// Case-insensitive substring match on the theater name, within one city
    pub async fn search_theaters(&self, name: &str, city_id: &CityId) -> Vec<Theater> {
        let mut results: Vec<Theater> = self
            .theaters
            .read()
            .await
            .values()
            .filter(|t| &t.city_id == city_id && name_matches(&t.name, name))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));
        results
    }

    /// Shows whose movie name contains `movie_name` and that start on `date`
    pub async fn search_shows(&self, movie_name: &str, date: NaiveDate) -> Vec<Show> {
        let mut results: Vec<Show> = self
            .shows
            .read()
            .await
            .values()
            .filter(|s| s.date() == date && name_matches(&s.movie_name, movie_name))
            .cloned()
            .collect();
        results.sort_by_key(|s| s.start_time);
        results
    }

    pub async fn shows_by_theater(&self, theater_id: &TheaterId, date: NaiveDate) -> Vec<Show> {
        let mut results: Vec<Show> = self
            .shows
            .read()
            .await
            .values()
            .filter(|s| &s.theater_id == theater_id && s.date() == date)
            .cloned()
            .collect();
        results.sort_by_key(|s| s.start_time);
        results
    }
}

#[async_trait]
impl ShowCatalog for InMemoryCatalog {
    async fn get_show(&self, id: &ShowId) -> CoreResult<Option<Show>> {
        Ok(self.shows.read().await.get(id).cloned())
    }
}
