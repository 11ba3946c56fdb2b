use futures::stream::{self, Stream};
use strum_macros::Display;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::registry::{BroadcastMessage, BroadcastRegistry, SubscriberId};

/// Lifecycle of a subscription session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionState {
    Connecting,
    Streaming,
    Closed,
}

/// One viewer's live feed of a room's events
///
/// The session is the only consumer of its queue. Closing it, explicitly or by
/// dropping it when the transport goes away, deregisters it from the registry
/// exactly once and ends the stream.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    room_id: String,
    receiver: mpsc::Receiver<BroadcastMessage>,
    registry: BroadcastRegistry,
    state: SubscriptionState,
}

impl Subscription {
    pub(super) fn new(
        id: SubscriberId,
        room_id: String,
        receiver: mpsc::Receiver<BroadcastMessage>,
        registry: BroadcastRegistry,
    ) -> Self {
        Self {
            id,
            room_id,
            receiver,
            registry,
            state: SubscriptionState::Connecting,
        }
    }

    pub(super) fn mark_streaming(&mut self) {
        if self.state == SubscriptionState::Connecting {
            self.state = SubscriptionState::Streaming;
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Waits for the next queued message
    ///
    /// Returns `None` once the session is closed or the registry has let go of it.
    pub async fn recv(&mut self) -> Option<BroadcastMessage> {
        if self.state == SubscriptionState::Closed {
            return None;
        }

        match self.receiver.recv().await {
            Some(message) => Some(message),
            None => {
                debug!(room_id = %self.room_id, subscriber = %self.id, "Subscriber queue ended");
                self.close();
                None
            }
        }
    }

    /// Takes the next queued message if one is ready
    pub fn try_recv(&mut self) -> Option<BroadcastMessage> {
        if self.state == SubscriptionState::Closed {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Deregisters the session and closes its queue; later calls do nothing
    pub fn close(&mut self) {
        if self.state == SubscriptionState::Closed {
            return;
        }

        let previous = self.state;
        self.state = SubscriptionState::Closed;
        self.registry.unsubscribe(&self.room_id, self.id);
        self.receiver.close();

        info!(
            room_id = %self.room_id,
            subscriber = %self.id,
            previous_state = %previous,
            "Subscription closed"
        );
    }

    /// Turns the session into a stream of messages in the order they were queued
    ///
    /// Dropping the stream closes the session.
    pub fn into_stream(self) -> impl Stream<Item = BroadcastMessage> + Send + 'static {
        stream::unfold(self, |mut subscription| async move {
            let message = subscription.recv().await?;
            Some((message, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
