use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use super::{
    actor::{Actor, MAX_NAME_LEN, SESSION_COOKIE},
    types::{JoinRequest, JoinResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for joining under a display name
///
/// POST /join
/// Returns an identity token and also sets it as the session cookie
#[instrument(name = "join", skip(state))]
pub async fn join(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Response, AppError> {
    let actor = Actor::new(&request.name).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Display name must be between 1 and {} characters",
            MAX_NAME_LEN
        ))
    })?;

    let token = state.token_config.create_token(actor.name())?;
    let cookie = HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    ))
    .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))?;

    info!(name = %actor.name(), "Participant joined");

    let body = JoinResponse {
        name: actor.name().to_string(),
        token,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
