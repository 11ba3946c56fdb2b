use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::shared::{AppError, AppState};

/// Name of the cookie that carries the identity token
pub const SESSION_COOKIE: &str = "session";

/// Longest display name accepted, in characters
pub const MAX_NAME_LEN: usize = 64;

/// A participant who has joined under a display name
///
/// Handlers that need an established identity extract `Actor`; extracting
/// `Option<Actor>` lets the caller decide how to treat its absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    name: String,
}

impl Actor {
    /// Returns `None` for a blank or overlong name
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return None;
        }
        Some(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or_else(|| {
            debug!("No identity token on request");
            AppError::Unauthorized("You must join first".to_string())
        })?;

        let claims = state.token_config.validate_token(token).map_err(|e| {
            warn!(error = %e, "Rejected identity token");
            e
        })?;

        Actor::new(&claims.username)
            .ok_or_else(|| AppError::Unauthorized("Invalid display name in token".to_string()))
    }
}

/// Finds the identity token, preferring a Bearer header over the session cookie
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| value)
    })
}
