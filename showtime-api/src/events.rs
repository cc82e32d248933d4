use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use showtime_shared::ShowId;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/shows/{id}/events", get(show_events))
}

/// Live seat lifecycle events for one show. Lagging clients skip what they missed.
async fn show_events(
    State(state): State<AppState>,
    Path(show_id): Path<ShowId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.manager.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let show_id = show_id.clone();
        async move {
            match result {
                Ok(event) if event.show_id() == &show_id => Event::default()
                    .event(event.name())
                    .json_data(&event)
                    .ok()
                    .map(Ok::<_, Infallible>),
                _ => None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
