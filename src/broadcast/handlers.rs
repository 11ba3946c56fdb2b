use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::{info, instrument};

use crate::shared::{AppError, AppState};

/// Server-sent event stream of a room's new rolls
///
/// GET /events/:room_id
/// Each event's data is one serialized roll. The subscription is released when
/// the client disconnects and axum drops the stream.
#[instrument(name = "stream_events", skip(state))]
pub async fn stream_events(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    state.room_service.get_room(&room_id).await?;

    let subscription = state.broadcast_registry.subscribe(&room_id);
    info!(
        room_id = %room_id,
        subscriber = %subscription.id(),
        "Event stream opened"
    );

    let stream = subscription
        .into_stream()
        .map(|message| Ok(Event::default().data(message)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
