// Library crate for the dice room server
// This file exposes the public API for integration tests

pub mod broadcast;
pub mod config;
pub mod roll;
pub mod room;
pub mod routes;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use broadcast::{BroadcastRegistry, Subscription, SubscriptionState};
pub use config::Config;
pub use roll::{DiceSpec, RollService};
pub use room::{InMemoryRoomRepository, RollEvent, Room, RoomRepository, RoomService};
pub use routes::router;
pub use session::{Actor, TokenConfig};
pub use shared::{AppError, AppState};
