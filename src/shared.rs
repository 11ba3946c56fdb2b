use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::broadcast::BroadcastRegistry;
use crate::roll::RollService;
use crate::room::{ClockRoomIdGenerator, RoomRepository, RoomService};
use crate::session::TokenConfig;

/// Shared application state containing all dependencies
///
/// Built once by the composition root; tests build their own isolated copies.
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
    pub roll_service: Arc<RollService>,
    pub broadcast_registry: BroadcastRegistry,
    pub token_config: TokenConfig,
    /// Path prefix prepended to links handed back to clients
    pub host_prefix: String,
}

impl AppState {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        broadcast_registry: BroadcastRegistry,
        token_config: TokenConfig,
        host_prefix: String,
    ) -> Self {
        let room_service = Arc::new(RoomService::new(
            room_repository,
            Arc::new(ClockRoomIdGenerator::new()),
        ));
        let roll_service = Arc::new(RollService::new(
            Arc::clone(&room_service),
            broadcast_registry.clone(),
        ));

        Self {
            room_service,
            roll_service,
            broadcast_registry,
            token_config,
            host_prefix,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token error: {0}")]
    Token(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) | AppError::Token(msg) | AppError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
