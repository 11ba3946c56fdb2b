use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{broadcast, roll, room, session, shared::AppState};

/// Builds the HTTP surface around an already composed AppState
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Dice room is ready." }))
        .route("/join", post(session::join))
        .route("/rooms", post(room::create_room))
        .route("/rooms/:room_id", get(room::get_room))
        .route("/rooms/:room_id/rolls", post(roll::submit_roll))
        .route("/events/:room_id", get(broadcast::stream_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
