use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{RoomCreatedResponse, RoomSnapshotResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /rooms
/// Returns the generated room id and a link to the room
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
) -> Result<Json<RoomCreatedResponse>, AppError> {
    let room_id = state.room_service.create_room().await?;
    let url = format!("{}/rooms/{}", state.host_prefix, room_id);

    info!(room_id = %room_id, url = %url, "Room created");

    Ok(Json(RoomCreatedResponse { id: room_id, url }))
}

/// HTTP handler returning the room's full event log
///
/// GET /rooms/:room_id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSnapshotResponse>, AppError> {
    let snapshot = state.room_service.snapshot(&room_id).await?;
    Ok(Json(snapshot))
}
