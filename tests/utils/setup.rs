use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use diceroom::{
    room::RoomSnapshotResponse, router, AppState, BroadcastRegistry, InMemoryRoomRepository,
    RollEvent, TokenConfig,
};

use super::stream::EventStreamReader;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub app: Router,
}

pub struct TestSetupBuilder {
    queue_capacity: usize,
    host_prefix: String,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            queue_capacity: diceroom::broadcast::DEFAULT_QUEUE_CAPACITY,
            host_prefix: String::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[allow(dead_code)]
    pub fn with_host_prefix(mut self, prefix: &str) -> Self {
        self.host_prefix = prefix.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            BroadcastRegistry::new(self.queue_capacity),
            TokenConfig::new("integration-secret", 1),
            self.host_prefix,
        );
        let app = router(state.clone());

        TestSetup { state, app }
    }
}

// ============================================================================
// HTTP Actions
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    pub fn registry(&self) -> &BroadcastRegistry {
        &self.state.broadcast_registry
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Creates a room and returns the full response body
    pub async fn create_room_response(&self) -> serde_json::Value {
        let request = Request::builder()
            .method("POST")
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();
        let (status, body) = self.send(request).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    pub async fn create_room(&self) -> String {
        let body = self.create_room_response().await;
        body["id"].as_str().unwrap().to_string()
    }

    /// Joins under `name` and returns the identity token
    pub async fn join(&self, name: &str) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/join")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "name": name }).to_string()))
            .unwrap();
        let (status, body) = self.send(request).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn roll(
        &self,
        room_id: &str,
        token: Option<&str>,
        dice: Option<&str>,
        desc: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/rooms/{}/rolls", room_id))
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = serde_json::json!({ "dice": dice, "desc": desc });
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Rolls and returns the recorded event, failing the test on any error
    pub async fn roll_ok(&self, room_id: &str, token: &str, dice: &str, desc: &str) -> RollEvent {
        let (status, body) = self.roll(room_id, Some(token), Some(dice), Some(desc)).await;
        assert_eq!(status, StatusCode::OK, "roll failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    pub async fn get_room(&self, room_id: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .uri(format!("/rooms/{}", room_id))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn snapshot(&self, room_id: &str) -> RoomSnapshotResponse {
        let (status, body) = self.get_room(room_id).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body).unwrap()
    }

    /// Opens the live event stream; the returned status is checked by the caller
    pub async fn open_stream(&self, room_id: &str) -> (StatusCode, EventStreamReader) {
        let request = Request::builder()
            .uri(format!("/events/{}", room_id))
            .body(Body::empty())
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        (response.status(), EventStreamReader::new(response.into_body()))
    }
}
