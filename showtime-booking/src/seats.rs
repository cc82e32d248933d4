use showtime_shared::{ReservationId, SeatId, ShowId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::BookingError;
use crate::models::{Seat, SeatStatus};

#[derive(Debug)]
struct SeatEntry {
    status: SeatStatus,
    /// Reservation holding the seat while `Held`
    holder: Option<ReservationId>,
}

type ShowSeats = BTreeMap<SeatId, SeatEntry>;

/// Authoritative seat status, partitioned per show.
///
/// Each show has its own lock so holds on different shows never contend.
/// Only the reservation manager may change seat status, hence the
/// crate-private mutators.
#[derive(Default)]
pub struct SeatStore {
    shows: RwLock<HashMap<ShowId, Arc<Mutex<ShowSeats>>>>,
}

impl SeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn show(&self, show_id: &ShowId) -> Option<Arc<Mutex<ShowSeats>>> {
        self.shows.read().await.get(show_id).cloned()
    }

    /// Register seats for a show as `Available`; labels already present are
    /// left untouched. Returns how many seats were added.
    pub(crate) async fn add_seats(&self, show_id: &ShowId, seat_ids: &[SeatId]) -> usize {
        let seats = {
            let mut shows = self.shows.write().await;
            Arc::clone(shows.entry(show_id.clone()).or_default())
        };

        let mut seats = seats.lock().await;
        let before = seats.len();
        for seat_id in seat_ids {
            seats.entry(seat_id.clone()).or_insert(SeatEntry {
                status: SeatStatus::Available,
                holder: None,
            });
        }
        seats.len() - before
    }

    /// Status of one seat, `None` if the seat does not exist
    pub async fn get(&self, show_id: &ShowId, seat_id: &SeatId) -> Option<SeatStatus> {
        let seats = self.show(show_id).await?;
        let seats = seats.lock().await;
        seats.get(seat_id).map(|entry| entry.status)
    }

    /// Every seat of the show, ordered by label
    pub async fn seats(&self, show_id: &ShowId) -> Vec<Seat> {
        let Some(seats) = self.show(show_id).await else {
            return Vec::new();
        };

        let seats = seats.lock().await;
        seats
            .iter()
            .map(|(id, entry)| Seat {
                id: id.clone(),
                show_id: show_id.clone(),
                status: entry.status,
            })
            .collect()
    }

    pub async fn available(&self, show_id: &ShowId) -> Vec<Seat> {
        self.seats(show_id)
            .await
            .into_iter()
            .filter(|seat| seat.status == SeatStatus::Available)
            .collect()
    }

    /// Hold every seat for `owner`, or none of them.
    ///
    /// Fails with `SeatNotFound` or `SeatUnavailable` for the first offending
    /// seat and leaves the whole set untouched.
    pub(crate) async fn try_hold(
        &self,
        show_id: &ShowId,
        seat_ids: &[SeatId],
        owner: &ReservationId,
    ) -> Result<(), BookingError> {
        let not_found = |seat_id: &SeatId| BookingError::SeatNotFound {
            show_id: show_id.clone(),
            seat_id: seat_id.clone(),
        };

        let Some(seats) = self.show(show_id).await else {
            return Err(match seat_ids.first() {
                Some(seat_id) => not_found(seat_id),
                None => BookingError::InvalidRequest("no seats requested".to_string()),
            });
        };

        let mut seats = seats.lock().await;
        for seat_id in seat_ids {
            let entry = seats.get(seat_id).ok_or_else(|| not_found(seat_id))?;
            if entry.status != SeatStatus::Available {
                return Err(BookingError::SeatUnavailable {
                    show_id: show_id.clone(),
                    seat_id: seat_id.clone(),
                });
            }
        }

        for seat_id in seat_ids {
            if let Some(entry) = seats.get_mut(seat_id) {
                entry.status = SeatStatus::Held;
                entry.holder = Some(owner.clone());
            }
        }

        Ok(())
    }

    /// `Held → Booked` for seats held by `owner`
    pub(crate) async fn mark_booked(&self, show_id: &ShowId, seat_ids: &[SeatId], owner: &ReservationId) {
        self.transition(show_id, seat_ids, owner, SeatStatus::Booked).await;
    }

    /// `Held → Available` for seats held by `owner`
    pub(crate) async fn release(&self, show_id: &ShowId, seat_ids: &[SeatId], owner: &ReservationId) {
        self.transition(show_id, seat_ids, owner, SeatStatus::Available).await;
    }

    /// Panics when a seat is not held by `owner`: that means the exclusion
    /// around reservations has been broken and no state can be trusted.
    async fn transition(
        &self,
        show_id: &ShowId,
        seat_ids: &[SeatId],
        owner: &ReservationId,
        to: SeatStatus,
    ) {
        let Some(seats) = self.show(show_id).await else {
            panic!("invariant violated: reservation {owner} references unknown show {show_id}");
        };

        let mut seats = seats.lock().await;
        for seat_id in seat_ids {
            match seats.get_mut(seat_id) {
                Some(entry)
                    if entry.status == SeatStatus::Held && entry.holder.as_ref() == Some(owner) =>
                {
                    entry.status = to;
                    entry.holder = None;
                }
                Some(entry) => panic!(
                    "invariant violated: seat {seat_id} of show {show_id} is {:?} (holder {:?}), expected Held by {owner}",
                    entry.status, entry.holder
                ),
                None => panic!("invariant violated: seat {seat_id} missing from show {show_id}"),
            }
        }
    }
}
