use showtime_catalog::PricingError;
use showtime_core::CoreError;
use showtime_shared::{BookingId, ReservationId, SeatId, ShowId};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    #[error("Seat {seat_id} not found for show {show_id}")]
    SeatNotFound { show_id: ShowId, seat_id: SeatId },

    #[error("Seat {seat_id} is not available for show {show_id}")]
    SeatUnavailable { show_id: ShowId, seat_id: SeatId },

    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    #[error("Reservation expired: {0}")]
    ReservationExpired(ReservationId),

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Catalog(#[from] CoreError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Coarse classification of a [`BookingError`] for callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Show, seat, reservation or booking is absent (caller error or a lost race)
    NotFound,
    /// Concurrent demand exceeded supply
    Conflict,
    /// The reservation aged out
    Expired,
    Invalid,
    /// A collaborator failed; passed through untouched
    Collaborator,
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::ShowNotFound(_)
            | BookingError::SeatNotFound { .. }
            | BookingError::ReservationNotFound(_)
            | BookingError::BookingNotFound(_) => ErrorKind::NotFound,
            BookingError::SeatUnavailable { .. } => ErrorKind::Conflict,
            BookingError::ReservationExpired(_) => ErrorKind::Expired,
            BookingError::InvalidRequest(_) => ErrorKind::Invalid,
            BookingError::Catalog(_) | BookingError::Pricing(_) => ErrorKind::Collaborator,
        }
    }
}
