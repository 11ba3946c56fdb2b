use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    id::RoomIdGenerator,
    models::Room,
    repository::RoomRepository,
    types::RoomSnapshotResponse,
};
use crate::shared::AppError;

const MAX_CREATE_ATTEMPTS: usize = 3;

/// Service for room creation and lookup
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    id_generator: Arc<dyn RoomIdGenerator>,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        id_generator: Arc<dyn RoomIdGenerator>,
    ) -> Self {
        Self {
            repository,
            id_generator,
        }
    }

    /// Creates a new empty room and returns its id
    #[instrument(skip(self))]
    pub async fn create_room(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let room_id = self.id_generator.generate().await;
            debug!(room_id = %room_id, attempt, "Generated room ID");

            match self.repository.create_room(&room_id).await {
                Ok(room) => {
                    info!(room_id = %room.id(), "Room created successfully");
                    return Ok(room_id);
                }
                Err(AppError::Conflict(msg)) => {
                    warn!(room_id = %room_id, attempt, "Room ID collision: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Internal(
            "Could not allocate a unique room id".to_string(),
        ))
    }

    /// Looks up a room, mapping a missing room to NotFound
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: &str) -> Result<Arc<Room>, AppError> {
        self.repository
            .get_room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} does not exist", room_id)))
    }

    /// Returns the full event log of a room as of now
    #[instrument(skip(self))]
    pub async fn snapshot(&self, room_id: &str) -> Result<RoomSnapshotResponse, AppError> {
        let room = self.get_room(room_id).await?;
        let log = room.snapshot();

        debug!(room_id = %room_id, events = log.len(), "Room snapshot taken");

        Ok(RoomSnapshotResponse {
            id: room.id().to_string(),
            log,
        })
    }
}
