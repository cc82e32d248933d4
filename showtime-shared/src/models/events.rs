use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, ReservationId, SeatId, ShowId};

/// Lifecycle events published by the reservation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEvent {
    SeatsHeld {
        reservation_id: ReservationId,
        show_id: ShowId,
        seat_ids: Vec<SeatId>,
        expires_at: DateTime<Utc>,
        timestamp: i64,
    },
    BookingConfirmed {
        booking_id: BookingId,
        reservation_id: ReservationId,
        show_id: ShowId,
        seat_ids: Vec<SeatId>,
        total_amount: i64,
        timestamp: i64,
    },
    ReservationExpired {
        reservation_id: ReservationId,
        show_id: ShowId,
        seat_ids: Vec<SeatId>,
        timestamp: i64,
    },
    ReservationCancelled {
        reservation_id: ReservationId,
        show_id: ShowId,
        seat_ids: Vec<SeatId>,
        timestamp: i64,
    },
}

impl BookingEvent {
    pub fn reservation_id(&self) -> &ReservationId {
        match self {
            BookingEvent::SeatsHeld { reservation_id, .. }
            | BookingEvent::BookingConfirmed { reservation_id, .. }
            | BookingEvent::ReservationExpired { reservation_id, .. }
            | BookingEvent::ReservationCancelled { reservation_id, .. } => reservation_id,
        }
    }

    pub fn show_id(&self) -> &ShowId {
        match self {
            BookingEvent::SeatsHeld { show_id, .. }
            | BookingEvent::BookingConfirmed { show_id, .. }
            | BookingEvent::ReservationExpired { show_id, .. }
            | BookingEvent::ReservationCancelled { show_id, .. } => show_id,
        }
    }

    /// Short name used as the SSE event type
    pub fn name(&self) -> &'static str {
        match self {
            BookingEvent::SeatsHeld { .. } => "seats_held",
            BookingEvent::BookingConfirmed { .. } => "booking_confirmed",
            BookingEvent::ReservationExpired { .. } => "reservation_expired",
            BookingEvent::ReservationCancelled { .. } => "reservation_cancelled",
        }
    }
}
