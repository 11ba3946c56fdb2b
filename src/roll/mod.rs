// Public API - what other modules can use
pub use dice::{DiceSpec, DEFAULT_SIDES};
pub use handlers::submit_roll;
pub use service::RollService;
pub use types::RollRequest;

// Internal modules
mod dice;
mod handlers;
mod service;
mod types;
