use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::SessionClaims;
use crate::shared::AppError;

pub const DEFAULT_EXPIRATION_DAYS: i64 = 365;
const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// Signs and checks identity tokens
///
/// A token only proves the holder picked a display name through /join; there
/// is no account behind it.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Arc<str>,
    pub expiration_days: i64,
}

impl TokenConfig {
    pub fn new(secret: &str, expiration_days: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            expiration_days,
        }
    }

    /// Creates a new JWT for `username`
    #[instrument(skip(self))]
    pub fn create_token(&self, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_days(self.expiration_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Token(format!(
                    "Token lifetime of {} days is out of range",
                    self.expiration_days
                ))
            })?
            .timestamp() as usize;

        debug!(
            expiration_days = self.expiration_days,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            session_id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Token(e.to_string())
        })
    }

    /// Validates a JWT and returns its claims
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(
                username = %data.claims.username,
                session_id = %data.claims.session_id,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized("Invalid session token".to_string())
        })
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET, DEFAULT_EXPIRATION_DAYS)
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiration_days", &self.expiration_days)
            .finish()
    }
}
