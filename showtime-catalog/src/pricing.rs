use serde::{Deserialize, Serialize};
use showtime_shared::SeatId;
use std::sync::Arc;

use crate::show::Show;

/// Prices a set of seats for a show.
///
/// Amounts are integer minor units (cents). Implementations are pure: the same
/// show and seat set always yield the same amount. An empty seat set is
/// rejected with [`PricingError::EmptySeatSet`] rather than priced at zero.
pub trait PricingStrategy: Send + Sync {
    fn calculate_price(&self, show: &Show, seats: &[SeatId]) -> Result<i64, PricingError>;
}

/// Pricing-related errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Cannot price an empty seat set")]
    EmptySeatSet,

    #[error("Price overflow for {seats} seats")]
    Overflow { seats: usize },
}

/// Which strategy the engine prices with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PricingModel {
    Fixed,
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub strategy: PricingModel,

    /// Price of one seat (in cents)
    pub base_price: i64,

    /// Added per seat for Saturday/Sunday shows (dynamic pricing only)
    #[serde(default)]
    pub weekend_surcharge: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strategy: PricingModel::Fixed,
            base_price: 1000,
            weekend_surcharge: 0,
        }
    }
}

impl PricingConfig {
    pub fn build(&self) -> Arc<dyn PricingStrategy> {
        match self.strategy {
            PricingModel::Fixed => Arc::new(FixedPricing::new(self.base_price)),
            PricingModel::Dynamic => {
                Arc::new(DynamicPricing::new(self.base_price, self.weekend_surcharge))
            }
        }
    }
}

fn per_seat(price: i64, seats: &[SeatId]) -> Result<i64, PricingError> {
    if seats.is_empty() {
        return Err(PricingError::EmptySeatSet);
    }

    i64::try_from(seats.len())
        .ok()
        .and_then(|count| price.checked_mul(count))
        .ok_or(PricingError::Overflow { seats: seats.len() })
}

/// Flat price per seat
#[derive(Debug, Clone)]
pub struct FixedPricing {
    base_price: i64,
}

impl FixedPricing {
    pub fn new(base_price: i64) -> Self {
        Self { base_price }
    }
}

impl PricingStrategy for FixedPricing {
    fn calculate_price(&self, _show: &Show, seats: &[SeatId]) -> Result<i64, PricingError> {
        per_seat(self.base_price, seats)
    }
}

/// Flat price per seat plus a per-seat surcharge on weekend shows
#[derive(Debug, Clone)]
pub struct DynamicPricing {
    base_price: i64,
    weekend_surcharge: i64,
}

impl DynamicPricing {
    pub fn new(base_price: i64, weekend_surcharge: i64) -> Self {
        Self {
            base_price,
            weekend_surcharge,
        }
    }
}

impl PricingStrategy for DynamicPricing {
    fn calculate_price(&self, show: &Show, seats: &[SeatId]) -> Result<i64, PricingError> {
        let price = per_seat(self.base_price, seats)?;
        if !show.is_weekend() {
            return Ok(price);
        }

        let surcharge = per_seat(self.weekend_surcharge, seats)?;
        price
            .checked_add(surcharge)
            .ok_or(PricingError::Overflow { seats: seats.len() })
    }
}
