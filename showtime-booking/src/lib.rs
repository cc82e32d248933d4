pub mod error;
pub mod models;
pub mod seats;
pub mod reservations;
pub mod expiry;
pub mod manager;

pub use error::{BookingError, ErrorKind};
pub use models::{Receipt, Reservation, Resolution, Seat, SeatStatus};
pub use seats::SeatStore;
pub use reservations::ReservationStore;
pub use expiry::ExpiryScheduler;
pub use manager::{Collaborators, ReservationManager, DEFAULT_HOLD_TTL, DEFAULT_RECIPIENT};
