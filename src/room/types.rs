use serde::{Deserialize, Serialize};

use super::models::RollEvent;

/// Response for room creation
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomCreatedResponse {
    pub id: String,
    /// Link to the room, including the configured host prefix
    pub url: String,
}

/// Full ordered event log of a room at request time
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSnapshotResponse {
    pub id: String,
    pub log: Vec<RollEvent>,
}
