use axum::body::{Body, BodyDataStream};
use futures::StreamExt;
use std::time::Duration;

use diceroom::RollEvent;

/// Reads server-sent events off a streaming response body
pub struct EventStreamReader {
    body: BodyDataStream,
    buffer: String,
}

#[allow(dead_code)]
impl EventStreamReader {
    pub fn new(body: Body) -> Self {
        Self {
            body: body.into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Next `data:` payload, or None if the stream ended or nothing came within `wait`
    pub async fn next_data(&mut self, wait: Duration) -> Option<String> {
        loop {
            if let Some(data) = self.take_buffered_event() {
                return Some(data);
            }

            let chunk = tokio::time::timeout(wait, self.body.next()).await.ok()??;
            let chunk = chunk.ok()?;
            self.buffer.push_str(std::str::from_utf8(&chunk).ok()?);
        }
    }

    pub async fn next_event(&mut self) -> Option<RollEvent> {
        let data = self.next_data(Duration::from_secs(2)).await?;
        Some(serde_json::from_str(&data).expect("stream data should be a roll event"))
    }

    /// Collects events until the stream stays quiet for a moment
    pub async fn drain_events(&mut self) -> Vec<RollEvent> {
        let mut events = Vec::new();
        while let Some(data) = self.next_data(Duration::from_millis(200)).await {
            events.push(serde_json::from_str(&data).expect("stream data should be a roll event"));
        }
        events
    }

    /// Waits until the server ends the stream
    pub async fn ended(&mut self, wait: Duration) -> bool {
        let result = tokio::time::timeout(wait, async {
            while self.body.next().await.is_some() {}
        })
        .await;
        result.is_ok()
    }

    fn take_buffered_event(&mut self) -> Option<String> {
        loop {
            let end = self.buffer.find("\n\n")?;
            let block: String = self.buffer.drain(..end + 2).collect();

            // Keep-alive comments carry no data line
            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|line| line.strip_prefix(' ').unwrap_or(line))
                .collect();
            if !data.is_empty() {
                return Some(data.join("\n"));
            }
        }
    }
}
