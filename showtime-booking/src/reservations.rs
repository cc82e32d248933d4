use showtime_shared::ReservationId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::models::Reservation;

/// Exclusion domain of one reservation.
///
/// Confirm, cancel and the expiry action all lock the slot before looking at
/// it. The first one to find `Some` takes the reservation and wins; everyone
/// after that finds `None`.
pub(crate) type ReservationSlot = Arc<Mutex<Option<Reservation>>>;

/// Live (pending) reservations
#[derive(Default)]
pub struct ReservationStore {
    slots: RwLock<HashMap<ReservationId, ReservationSlot>>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert(&self, reservation: Reservation) {
        let id = reservation.id.clone();
        let slot = Arc::new(Mutex::new(Some(reservation)));
        self.slots.write().await.insert(id, slot);
    }

    /// The map lock is released before the caller locks the slot, so work on
    /// one reservation never blocks another.
    pub(crate) async fn slot(&self, id: &ReservationId) -> Option<ReservationSlot> {
        self.slots.read().await.get(id).cloned()
    }

    pub(crate) async fn remove(&self, id: &ReservationId) {
        self.slots.write().await.remove(id);
    }

    /// Snapshot of a pending reservation
    pub async fn get(&self, id: &ReservationId) -> Option<Reservation> {
        let slot = self.slot(id).await?;
        let reservation = slot.lock().await;
        reservation.clone()
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
