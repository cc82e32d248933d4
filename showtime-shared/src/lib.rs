pub mod ids;
pub mod models;

pub use ids::{BookingId, CityId, ReservationId, SeatId, ShowId, TheaterId};
pub use models::events::BookingEvent;
