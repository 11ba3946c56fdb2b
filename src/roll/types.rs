use serde::{Deserialize, Serialize};

/// Request payload for a roll; every field is optional
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RollRequest {
    /// Die to roll, e.g. "d6"; anything unreadable rolls a d20
    #[serde(default)]
    pub dice: Option<String>,
    /// Free-text note shown next to the result
    #[serde(default)]
    pub desc: Option<String>,
}
