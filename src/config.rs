use clap::Parser;

use crate::broadcast::DEFAULT_QUEUE_CAPACITY;
use crate::session::DEFAULT_EXPIRATION_DAYS;

/// Upper bound on token lifetime accepted from the command line
pub const MAX_EXPIRATION_DAYS: i64 = 36_500;

/// Server configuration, read from the command line with environment fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "diceroom", about = "Shared dice rooms with live roll streams")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path prefix for links handed to clients when running behind a gateway
    /// that strips it, e.g. /tbc/dice_room
    #[arg(long, env = "HOST_PREFIX", default_value = "")]
    pub host_prefix: String,

    /// Pending events a viewer may have queued before new ones are dropped
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Secret used to sign identity tokens
    #[arg(
        long,
        env = "JWT_SECRET",
        default_value = "your-secret-key-change-in-production",
        hide_env_values = true
    )]
    pub jwt_secret: String,

    /// Lifetime of identity tokens in days
    #[arg(
        long,
        env = "SESSION_EXPIRATION_DAYS",
        default_value_t = DEFAULT_EXPIRATION_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_EXPIRATION_DAYS)
    )]
    pub session_expiration_days: i64,
}

impl Config {
    /// Host prefix without a trailing slash, so links can be built as `{prefix}/rooms/...`
    pub fn normalized_host_prefix(&self) -> String {
        self.host_prefix.trim_end_matches('/').to_string()
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
