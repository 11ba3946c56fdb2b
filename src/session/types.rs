use serde::{Deserialize, Serialize};

/// JWT claims carrying a participant's self-asserted display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub session_id: String,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request payload for joining with a display name
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

/// Response for the join endpoint; the token is also set as a cookie
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JoinResponse {
    pub name: String,
    pub token: String,
}
