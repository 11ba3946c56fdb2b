use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};

use super::models::Room;
use crate::shared::AppError;

/// Trait for room storage operations
#[async_trait]
pub trait RoomRepository {
    /// Inserts a new empty room; fails if the id is already taken
    async fn create_room(&self, room_id: &str) -> Result<Arc<Room>, AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<Arc<Room>>, AppError>;
    async fn room_count(&self) -> Result<usize, AppError>;
}

/// In-memory implementation of RoomRepository
///
/// Rooms live for the lifetime of the process. The map lock only covers the
/// lookup or insert itself; room logs are guarded by each room separately.
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, Arc<Room>>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn lock_rooms(&self) -> MutexGuard<'_, HashMap<String, Arc<Room>>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(&self, room_id: &str) -> Result<Arc<Room>, AppError> {
        debug!(room_id = %room_id, "Creating room in memory");

        let mut rooms = self.lock_rooms();
        if rooms.contains_key(room_id) {
            warn!(room_id = %room_id, "Room already exists in memory");
            return Err(AppError::Conflict(format!("Room {} already exists", room_id)));
        }

        let room = Arc::new(Room::new(room_id.to_string()));
        rooms.insert(room_id.to_string(), Arc::clone(&room));

        debug!(room_id = %room_id, "Room created successfully in memory");
        Ok(room)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<Arc<Room>>, AppError> {
        let room = self.lock_rooms().get(room_id).cloned();

        match &room {
            Some(_) => debug!(room_id = %room_id, "Room found in memory"),
            None => debug!(room_id = %room_id, "Room not found in memory"),
        }

        Ok(room)
    }

    async fn room_count(&self) -> Result<usize, AppError> {
        Ok(self.lock_rooms().len())
    }
}
