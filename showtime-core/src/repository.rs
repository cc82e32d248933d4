use async_trait::async_trait;
use showtime_catalog::Show;
use showtime_shared::ShowId;

use crate::CoreResult;

/// Read-only catalog lookup used by the booking engine
#[async_trait]
pub trait ShowCatalog: Send + Sync {
    /// `Ok(None)` when the show does not exist. Any other failure is
    /// reported as an error and propagated by callers unchanged.
    async fn get_show(&self, id: &ShowId) -> CoreResult<Option<Show>>;
}
