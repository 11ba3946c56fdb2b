use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use super::types::RollRequest;
use crate::{
    room::RollEvent,
    session::Actor,
    shared::{AppError, AppState},
};

/// HTTP handler for rolling a die in a room
///
/// POST /rooms/:room_id/rolls
/// Requires an identity token from POST /join, as a Bearer header or cookie.
/// The body is optional; without one the default die is rolled.
#[instrument(name = "submit_roll", skip(state, actor, request))]
pub async fn submit_roll(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    actor: Option<Actor>,
    request: Option<Json<RollRequest>>,
) -> Result<Json<RollEvent>, AppError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();

    let event = state
        .roll_service
        .submit_roll(
            &room_id,
            actor.as_ref(),
            request.dice.as_deref(),
            request.desc.as_deref(),
        )
        .await?;

    Ok(Json(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn router(state: AppState) -> Router {
        Router::new()
            .route("/rooms/:room_id/rolls", axum::routing::post(submit_roll))
            .with_state(state)
    }

    fn roll_request(room_id: &str, auth: Option<(&str, String)>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/rooms/{}/rolls", room_id))
            .header("content-type", "application/json");
        if let Some((name, value)) = auth {
            builder = builder.header(name, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_roll_with_bearer_token() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_service.create_room().await.unwrap();
        let token = state.token_config.create_token("Ada").unwrap();
        let app = router(state.clone());

        let request = roll_request(
            &room_id,
            Some((header::AUTHORIZATION.as_str(), format!("Bearer {}", token))),
            r#"{"dice": "d6", "desc": "stealth"}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let event: RollEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(event.actor, "Ada");
        assert_eq!(event.sides, 6);
        assert!((1..=6).contains(&event.result));
        assert_eq!(event.annotation.as_deref(), Some("stealth"));

        let snapshot = state.room_service.snapshot(&room_id).await.unwrap();
        assert_eq!(snapshot.log, vec![event]);
    }

    #[tokio::test]
    async fn test_roll_with_session_cookie_and_empty_body() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_service.create_room().await.unwrap();
        let token = state.token_config.create_token("Grace").unwrap();
        let app = router(state);

        let request = roll_request(
            &room_id,
            Some((header::COOKIE.as_str(), format!("theme=dark; session={}", token))),
            "{}",
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let event: RollEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(event.actor, "Grace");
        assert_eq!(event.sides, 20);
    }

    #[tokio::test]
    async fn test_roll_without_body_rolls_default_die() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_service.create_room().await.unwrap();
        let token = state.token_config.create_token("Ada").unwrap();
        let app = router(state.clone());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/rooms/{}/rolls", room_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let event: RollEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(event.sides, 20);
        assert_eq!(event.annotation, None);

        let snapshot = state.room_service.snapshot(&room_id).await.unwrap();
        assert_eq!(snapshot.log, vec![event]);
    }

    #[tokio::test]
    async fn test_roll_without_identity_is_unauthorized() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_service.create_room().await.unwrap();
        let app = router(state);

        let response = app
            .oneshot(roll_request(&room_id, None, r#"{"dice": "d6"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_roll_with_forged_token_is_unauthorized() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_service.create_room().await.unwrap();
        let app = router(state);

        let request = roll_request(
            &room_id,
            Some((header::AUTHORIZATION.as_str(), "Bearer not.a.token".to_string())),
            "{}",
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_roll_in_unknown_room_is_not_found() {
        let state = AppStateBuilder::new().build();
        let token = state.token_config.create_token("Ada").unwrap();
        let app = router(state);

        let request = roll_request(
            "missing",
            Some((header::AUTHORIZATION.as_str(), format!("Bearer {}", token))),
            "{}",
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
