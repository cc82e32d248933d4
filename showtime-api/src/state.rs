use showtime_booking::{Collaborators, ReservationManager};
use showtime_store::app_config::{BookingRules, Config};
use showtime_store::InMemoryCatalog;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub manager: ReservationManager,
    pub rules: BookingRules,
}

impl AppState {
    /// Wire the engine and its collaborators from configuration
    pub fn from_config(config: &Config) -> Self {
        let ids = config.ids.strategy.build();
        let catalog = Arc::new(InMemoryCatalog::new(Arc::clone(&ids)));

        let manager = ReservationManager::new(
            Collaborators {
                catalog: catalog.clone(),
                pricing: config.pricing.build(),
                ids,
                notifier: config.notification.channel.build(),
            },
            config.booking.hold_ttl(),
        );

        Self {
            catalog,
            manager,
            rules: config.booking.clone(),
        }
    }
}
