// Self-asserted identity: a display name signed into a token
//
// The core only asks whether an Actor is present; everything about how the
// name travels (Bearer header or cookie) lives here.

// Public API - what other modules can use
pub use actor::{Actor, MAX_NAME_LEN, SESSION_COOKIE};
pub use handlers::join;
pub use token::{TokenConfig, DEFAULT_EXPIRATION_DAYS};
pub use types::{JoinRequest, JoinResponse, SessionClaims};

// Internal modules
mod actor;
mod handlers;
mod token;
mod types;
