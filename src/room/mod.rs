// Public API - what other modules can use
pub use handlers::{create_room, get_room};
pub use id::{ClockRoomIdGenerator, RoomIdGenerator};
pub use models::{Room, RollEvent};
pub use repository::{InMemoryRoomRepository, RoomRepository};
pub use service::RoomService;
pub use types::{RoomCreatedResponse, RoomSnapshotResponse};

// Internal modules
mod handlers;
pub mod id;
pub mod models;
pub mod repository;
mod service;
mod types;
