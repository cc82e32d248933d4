use chrono::Utc;
use showtime_catalog::PricingStrategy;
use showtime_core::{IdGenerator, Notifier, ShowCatalog};
use showtime_shared::{BookingEvent, BookingId, ReservationId, SeatId, ShowId};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::BookingError;
use crate::expiry::ExpiryScheduler;
use crate::models::{Receipt, Reservation, Resolution, Seat, SeatStatus};
use crate::reservations::ReservationStore;
use crate::seats::SeatStore;

/// Hold time used by [`ReservationManager::reserve_default`] unless configured otherwise
pub const DEFAULT_HOLD_TTL: Duration = Duration::from_secs(300);

/// Who is notified when no contact was given at reserve time
pub const DEFAULT_RECIPIENT: &str = "guest";

const EVENT_BUFFER: usize = 256;

type Result<T> = std::result::Result<T, BookingError>;

/// External services the engine calls into but does not implement
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn ShowCatalog>,
    pub pricing: Arc<dyn PricingStrategy>,
    pub ids: Arc<dyn IdGenerator>,
    pub notifier: Arc<dyn Notifier>,
}

struct Inner {
    collaborators: Collaborators,
    seats: SeatStore,
    reservations: ReservationStore,
    scheduler: ExpiryScheduler,
    bookings: RwLock<HashMap<BookingId, Receipt>>,
    events: broadcast::Sender<BookingEvent>,
    default_ttl: Duration,
}

/// Drives every reservation from `Pending` to exactly one terminal state.
///
/// Seat status and reservation existence are only ever changed from here.
/// Confirm, cancel and the expiry timer of one reservation serialize on that
/// reservation's slot; the first to take the record performs the terminal
/// transition, the others see it gone.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ReservationManager {
    inner: Arc<Inner>,
}

impl ReservationManager {
    pub fn new(collaborators: Collaborators, default_ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(Inner {
                collaborators,
                seats: SeatStore::new(),
                reservations: ReservationStore::new(),
                scheduler: ExpiryScheduler::new(),
                bookings: RwLock::new(HashMap::new()),
                events,
                default_ttl,
            }),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Seed seats for a catalogued show. Labels already present are ignored.
    pub async fn add_seats(&self, show_id: &ShowId, seat_ids: Vec<SeatId>) -> Result<usize> {
        self.require_show(show_id).await?;
        let added = self.inner.seats.add_seats(show_id, &seat_ids).await;
        info!(show_id = %show_id, added, "Seats added");
        Ok(added)
    }

    /// Hold `seat_ids` for `ttl`, notifying [`DEFAULT_RECIPIENT`] on confirmation
    pub async fn reserve(&self, show_id: &ShowId, seat_ids: &[SeatId], ttl: Duration) -> Result<Reservation> {
        self.reserve_for(DEFAULT_RECIPIENT, show_id, seat_ids, ttl).await
    }

    pub async fn reserve_default(&self, show_id: &ShowId, seat_ids: &[SeatId]) -> Result<Reservation> {
        self.reserve(show_id, seat_ids, self.inner.default_ttl).await
    }

    /// Hold every seat or none, then arm the expiry timer.
    ///
    /// Duplicate labels are collapsed; the reservation lists its seats in
    /// label order.
    pub async fn reserve_for(
        &self,
        recipient: &str,
        show_id: &ShowId,
        seat_ids: &[SeatId],
        ttl: Duration,
    ) -> Result<Reservation> {
        if seat_ids.is_empty() {
            return Err(BookingError::InvalidRequest("at least one seat is required".to_string()));
        }
        if ttl.is_zero() {
            return Err(BookingError::InvalidRequest("hold time must be positive".to_string()));
        }
        // Everything that can fail happens before any seat is held
        let too_long = || BookingError::InvalidRequest(format!("hold time {:?} is too long", ttl));
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|expires_in| Utc::now().checked_add_signed(expires_in))
            .ok_or_else(too_long)?;
        let deadline = Instant::now().checked_add(ttl).ok_or_else(too_long)?;

        self.require_show(show_id).await?;

        let seat_ids: Vec<SeatId> = seat_ids.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let reservation_id = ReservationId::new(self.inner.collaborators.ids.generate_id());

        self.inner.seats.try_hold(show_id, &seat_ids, &reservation_id).await?;

        let reservation = Reservation::new(
            reservation_id.clone(),
            show_id.clone(),
            seat_ids,
            recipient.to_string(),
            expires_at,
            deadline,
        );
        self.inner.reservations.insert(reservation.clone()).await;

        let weak = Arc::downgrade(&self.inner);
        let id = reservation_id.clone();
        self.inner
            .scheduler
            .schedule(reservation_id.clone(), reservation.deadline(), async move {
                expire_if_alive(weak, id).await;
            })
            .await;
        debug!(reservation_id = %reservation_id, ?ttl, "Expiry armed");

        info!(
            reservation_id = %reservation.id,
            show_id = %reservation.show_id,
            seats = reservation.seat_ids.len(),
            "Seats held until {}",
            reservation.expires_at
        );
        self.publish(BookingEvent::SeatsHeld {
            reservation_id: reservation.id.clone(),
            show_id: reservation.show_id.clone(),
            seat_ids: reservation.seat_ids.clone(),
            expires_at: reservation.expires_at,
            timestamp: Utc::now().timestamp(),
        });

        Ok(reservation)
    }

    /// Turn a pending reservation into a booking.
    ///
    /// `ReservationNotFound` means something else resolved it first. A
    /// reservation found past its deadline is reclaimed here and reported as
    /// `ReservationExpired`. Catalog or pricing failures leave it pending.
    pub async fn confirm(&self, reservation_id: &ReservationId) -> Result<Receipt> {
        let slot = self
            .inner
            .reservations
            .slot(reservation_id)
            .await
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.clone()))?;

        let mut guard = slot.lock().await;
        let Some(reservation) = guard.take() else {
            warn!(reservation_id = %reservation_id, "Confirm lost the race, reservation already resolved");
            return Err(BookingError::ReservationNotFound(reservation_id.clone()));
        };

        if reservation.is_expired() {
            return Err(self.expire_late(reservation).await);
        }

        let total_amount = match self.price(&reservation).await {
            Ok(amount) => amount,
            Err(err) => {
                *guard = Some(reservation);
                return Err(err);
            }
        };

        // Collaborators may have been slow enough to cross the deadline
        if reservation.is_expired() {
            return Err(self.expire_late(reservation).await);
        }

        self.inner
            .seats
            .mark_booked(&reservation.show_id, &reservation.seat_ids, &reservation.id)
            .await;

        let receipt = Receipt {
            booking_id: BookingId::new(self.inner.collaborators.ids.generate_id()),
            reservation_id: reservation.id.clone(),
            show_id: reservation.show_id.clone(),
            seat_ids: reservation.seat_ids.clone(),
            total_amount,
            issued_at: Utc::now(),
        };
        self.inner
            .bookings
            .write()
            .await
            .insert(receipt.booking_id.clone(), receipt.clone());
        self.inner.reservations.remove(reservation_id).await;
        drop(guard);

        if self.inner.scheduler.cancel(reservation_id).await {
            debug!(reservation_id = %reservation_id, "Expiry revoked");
        }

        info!(
            booking_id = %receipt.booking_id,
            reservation_id = %reservation_id,
            total_amount,
            "Reservation {}",
            Resolution::Confirmed
        );
        self.publish(BookingEvent::BookingConfirmed {
            booking_id: receipt.booking_id.clone(),
            reservation_id: receipt.reservation_id.clone(),
            show_id: receipt.show_id.clone(),
            seat_ids: receipt.seat_ids.clone(),
            total_amount,
            timestamp: Utc::now().timestamp(),
        });

        let message = format!("Your booking {} has been confirmed.", receipt.booking_id);
        if let Err(err) = self
            .inner
            .collaborators
            .notifier
            .send_notification(&reservation.recipient, &message)
            .await
        {
            warn!(booking_id = %receipt.booking_id, "Notification failed: {}", err);
        }

        Ok(receipt)
    }

    /// Give the seats back before the hold runs out
    pub async fn cancel(&self, reservation_id: &ReservationId) -> Result<()> {
        let slot = self
            .inner
            .reservations
            .slot(reservation_id)
            .await
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.clone()))?;

        let mut guard = slot.lock().await;
        let Some(reservation) = guard.take() else {
            warn!(reservation_id = %reservation_id, "Cancel lost the race, reservation already resolved");
            return Err(BookingError::ReservationNotFound(reservation_id.clone()));
        };
        self.reclaim(reservation, Resolution::Cancelled).await;
        drop(guard);

        if self.inner.scheduler.cancel(reservation_id).await {
            debug!(reservation_id = %reservation_id, "Expiry revoked");
        }
        Ok(())
    }

    /// Expiry timer body. Returns whether this call performed the reclaim.
    pub(crate) async fn expire(&self, reservation_id: &ReservationId) -> bool {
        let Some(slot) = self.inner.reservations.slot(reservation_id).await else {
            return false;
        };

        let mut guard = slot.lock().await;
        match guard.take() {
            Some(reservation) => {
                self.reclaim(reservation, Resolution::Expired).await;
                true
            }
            None => {
                debug!(reservation_id = %reservation_id, "Expiry found reservation already resolved");
                false
            }
        }
    }

    /// Reclaim a reservation that confirm found past its deadline before the
    /// timer got to it. The caller holds the slot.
    async fn expire_late(&self, reservation: Reservation) -> BookingError {
        let reservation_id = reservation.id.clone();
        self.reclaim(reservation, Resolution::Expired).await;
        self.inner.scheduler.cancel(&reservation_id).await;
        warn!(reservation_id = %reservation_id, "Confirm arrived after the deadline");
        BookingError::ReservationExpired(reservation_id)
    }

    /// Release the seats and forget the reservation. The caller holds the slot.
    async fn reclaim(&self, reservation: Reservation, resolution: Resolution) {
        self.inner
            .seats
            .release(&reservation.show_id, &reservation.seat_ids, &reservation.id)
            .await;
        self.inner.reservations.remove(&reservation.id).await;

        info!(
            reservation_id = %reservation.id,
            show_id = %reservation.show_id,
            seats = reservation.seat_ids.len(),
            "Reservation {}, seats released",
            resolution
        );

        let Reservation { id, show_id, seat_ids, .. } = reservation;
        let timestamp = Utc::now().timestamp();
        let event = match resolution {
            Resolution::Cancelled => BookingEvent::ReservationCancelled {
                reservation_id: id,
                show_id,
                seat_ids,
                timestamp,
            },
            _ => BookingEvent::ReservationExpired {
                reservation_id: id,
                show_id,
                seat_ids,
                timestamp,
            },
        };
        self.publish(event);
    }

    async fn price(&self, reservation: &Reservation) -> Result<i64> {
        let show = self.require_show(&reservation.show_id).await?;
        let amount = self
            .inner
            .collaborators
            .pricing
            .calculate_price(&show, &reservation.seat_ids)?;
        Ok(amount)
    }

    async fn require_show(&self, show_id: &ShowId) -> Result<showtime_catalog::Show> {
        self.inner
            .collaborators
            .catalog
            .get_show(show_id)
            .await?
            .ok_or_else(|| BookingError::ShowNotFound(show_id.clone()))
    }

    fn publish(&self, event: BookingEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }

    /// Available seats of a show, ordered by label
    pub async fn available_seats(&self, show_id: &ShowId) -> Result<Vec<Seat>> {
        self.require_show(show_id).await?;
        Ok(self.inner.seats.available(show_id).await)
    }

    /// Every seat of a show with its status
    pub async fn seats(&self, show_id: &ShowId) -> Result<Vec<Seat>> {
        self.require_show(show_id).await?;
        Ok(self.inner.seats.seats(show_id).await)
    }

    pub async fn seat_status(&self, show_id: &ShowId, seat_id: &SeatId) -> Result<SeatStatus> {
        self.inner
            .seats
            .get(show_id, seat_id)
            .await
            .ok_or_else(|| BookingError::SeatNotFound {
                show_id: show_id.clone(),
                seat_id: seat_id.clone(),
            })
    }

    /// A reservation that is still pending
    pub async fn get_reservation(&self, reservation_id: &ReservationId) -> Result<Reservation> {
        self.inner
            .reservations
            .get(reservation_id)
            .await
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.clone()))
    }

    pub async fn get_booking(&self, booking_id: &BookingId) -> Result<Receipt> {
        self.inner
            .bookings
            .read()
            .await
            .get(booking_id)
            .cloned()
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.clone()))
    }

    pub async fn live_reservations(&self) -> usize {
        self.inner.reservations.len().await
    }

    pub async fn pending_expiries(&self) -> usize {
        self.inner.scheduler.pending_count().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.inner.events.subscribe()
    }
}

/// Timers only hold a weak reference; once the manager is gone they do nothing
async fn expire_if_alive(inner: Weak<Inner>, reservation_id: ReservationId) {
    if let Some(inner) = inner.upgrade() {
        ReservationManager { inner }.expire(&reservation_id).await;
    }
}
