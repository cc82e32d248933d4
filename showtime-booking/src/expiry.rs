use showtime_shared::ReservationId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::time::Instant;
use tracing::debug;

/// One deferred action per reservation.
///
/// Each scheduled action runs on its own task once its deadline passes.
/// `cancel` revokes a timer that has not fired yet; a timer that has already
/// fired always runs its action to completion. Dropping the scheduler revokes
/// every pending timer.
pub struct ExpiryScheduler {
    pending: Arc<Mutex<HashMap<ReservationId, oneshot::Sender<()>>>>,
}

impl ExpiryScheduler {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm `action` to run at `deadline`
    pub async fn schedule<F>(&self, id: ReservationId, deadline: Instant, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        // Registered before the task exists so the task can always clear it
        self.pending.lock().await.insert(id.clone(), cancel_tx);

        // Weak, so dropping the scheduler drops every sender and revokes the timers
        let pending = Arc::downgrade(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    if let Some(pending) = pending.upgrade() {
                        pending.lock().await.remove(&id);
                    }
                    debug!(reservation_id = %id, "Expiry timer fired");
                    action.await;
                }
                _ = cancel_rx => {
                    debug!(reservation_id = %id, "Expiry timer revoked");
                }
            }
        });
    }

    /// Revoke a pending timer. Returns false if no timer was pending.
    pub async fn cancel(&self, id: &ReservationId) -> bool {
        match self.pending.lock().await.remove(id) {
            Some(cancel_tx) => cancel_tx.send(()).is_ok(),
            None => false,
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for ExpiryScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_action(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_runs_at_deadline() {
        let scheduler = ExpiryScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let deadline = Instant::now() + Duration::from_secs(5);

        scheduler.schedule("r-1".into(), deadline, counting_action(&fired)).await;
        assert_eq!(scheduler.pending_count().await, 1);

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_action_never_runs() {
        let scheduler = ExpiryScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let deadline = Instant::now() + Duration::from_secs(1);

        scheduler.schedule("r-1".into(), deadline, counting_action(&fired)).await;
        assert!(scheduler.cancel(&"r-1".into()).await);
        assert!(!scheduler.cancel(&"r-1".into()).await);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_reports_false() {
        let scheduler = ExpiryScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule("r-1".into(), Instant::now() + Duration::from_secs(1), counting_action(&fired))
            .await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.cancel(&"r-1".into()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_revokes_timers() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = ExpiryScheduler::new();
            scheduler
                .schedule("r-1".into(), Instant::now() + Duration::from_secs(1), counting_action(&fired))
                .await;
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
