use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use showtime_shared::{BookingId, ReservationId, SeatId, ShowId};
use std::fmt;
use tokio::time::Instant;

/// Seat status within a show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    Booked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub show_id: ShowId,
    pub status: SeatStatus,
}

/// How a reservation left the pending state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Confirmed,
    Expired,
    Cancelled,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resolution::Confirmed => "CONFIRMED",
            Resolution::Expired => "EXPIRED",
            Resolution::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// A pending hold on a set of seats.
///
/// A reservation is never mutated: while it exists it is pending, and it is
/// removed from the store as soon as it is confirmed, expired or cancelled.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub show_id: ShowId,
    /// Sorted, without duplicates
    pub seat_ids: Vec<SeatId>,
    /// Who gets the confirmation message
    pub recipient: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Monotonic twin of `expires_at`; every expiry decision uses this one
    #[serde(skip)]
    deadline: Instant,
}

impl Reservation {
    /// Both expiry instants are computed by the caller, so building the
    /// record cannot fail once seats are held.
    pub(crate) fn new(
        id: ReservationId,
        show_id: ShowId,
        seat_ids: Vec<SeatId>,
        recipient: String,
        expires_at: DateTime<Utc>,
        deadline: Instant,
    ) -> Self {
        Self {
            id,
            show_id,
            seat_ids,
            recipient,
            created_at: Utc::now(),
            expires_at,
            deadline,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Expired at or after the deadline instant
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Terminal record of a confirmed reservation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub booking_id: BookingId,
    pub reservation_id: ReservationId,
    pub show_id: ShowId,
    pub seat_ids: Vec<SeatId>,
    /// In cents
    pub total_amount: i64,
    pub issued_at: DateTime<Utc>,
}
