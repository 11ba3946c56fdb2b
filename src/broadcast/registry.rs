use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};

use super::subscription::Subscription;

/// Pending messages a single subscriber may have queued before new ones are dropped
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// A serialized event, shared between every subscriber it is delivered to
pub type BroadcastMessage = Arc<str>;

/// Process-unique identifier of one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry-side half of a subscription: the producer end of its queue
#[derive(Debug, Clone)]
struct SubscriberHandle {
    id: SubscriberId,
    sender: mpsc::Sender<BroadcastMessage>,
}

#[derive(Debug)]
struct RegistryInner {
    rooms: Mutex<HashMap<String, Vec<SubscriberHandle>>>,
    queue_capacity: usize,
    next_id: AtomicU64,
    dropped: AtomicU64,
    shut_down: AtomicBool,
}

/// Fans serialized room events out to every live subscriber of that room
///
/// Delivery is best effort: a subscriber whose queue is full simply misses the
/// message, so a stalled viewer never holds up the publisher or other viewers.
/// The room map lock is only held to register, deregister, or copy a room's
/// handle list; the per-handle sends happen after it is released.
#[derive(Debug, Clone)]
pub struct BroadcastRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for BroadcastRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl BroadcastRegistry {
    /// Creates an empty registry; `queue_capacity` is clamped to at least 1
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                rooms: Mutex::new(HashMap::new()),
                queue_capacity: queue_capacity.max(1),
                next_id: AtomicU64::new(1),
                dropped: AtomicU64::new(0),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.inner.queue_capacity
    }

    /// Opens a new subscription for `room_id`
    ///
    /// After `shutdown` the returned subscription is already closed.
    pub fn subscribe(&self, room_id: &str) -> Subscription {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.inner.queue_capacity);
        let mut subscription = Subscription::new(id, room_id.to_string(), receiver, self.clone());

        {
            let mut rooms = self.lock_rooms();
            if self.inner.shut_down.load(Ordering::Acquire) {
                drop(rooms);
                debug!(room_id = %room_id, subscriber = %id, "Registry shut down, subscription refused");
                subscription.close();
                return subscription;
            }
            rooms
                .entry(room_id.to_string())
                .or_default()
                .push(SubscriberHandle { id, sender });
        }

        subscription.mark_streaming();
        info!(room_id = %room_id, subscriber = %id, "Subscriber registered");
        subscription
    }

    /// Removes a subscriber from its room; returns whether it was still registered
    ///
    /// Calling this for an already removed subscriber is a no-op.
    pub fn unsubscribe(&self, room_id: &str, id: SubscriberId) -> bool {
        let mut rooms = self.lock_rooms();
        let Some(handles) = rooms.get_mut(room_id) else {
            return false;
        };

        let before = handles.len();
        handles.retain(|handle| handle.id != id);
        let removed = handles.len() != before;

        if handles.is_empty() {
            rooms.remove(room_id);
        }
        drop(rooms);

        if removed {
            info!(room_id = %room_id, subscriber = %id, "Subscriber removed");
        }
        removed
    }

    /// Delivers `message` to every current subscriber of `room_id` without waiting
    ///
    /// Returns how many subscribers accepted the message.
    pub fn publish(&self, room_id: &str, message: impl Into<BroadcastMessage>) -> usize {
        let handles = match self.lock_rooms().get(room_id) {
            Some(handles) => handles.clone(),
            None => {
                debug!(room_id = %room_id, "No subscribers for room");
                return 0;
            }
        };

        let message = message.into();
        let mut delivered = 0;
        for handle in &handles {
            match handle.sender.try_send(Arc::clone(&message)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                    debug!(room_id = %room_id, subscriber = %handle.id, "Subscriber queue full, message dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(room_id = %room_id, subscriber = %handle.id, "Subscriber already closed");
                }
            }
        }

        debug!(
            room_id = %room_id,
            subscribers = handles.len(),
            delivered,
            "Room event published"
        );
        delivered
    }

    /// Drops every registered subscriber so their streams end, and refuses new ones
    ///
    /// Returns the number of subscribers that were closed.
    pub fn shutdown(&self) -> usize {
        let rooms = {
            let mut rooms = self.lock_rooms();
            self.inner.shut_down.store(true, Ordering::Release);
            std::mem::take(&mut *rooms)
        };

        let closed = rooms.values().map(Vec::len).sum();
        info!(subscribers = closed, "Broadcast registry shut down");
        closed
    }

    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.lock_rooms().get(room_id).map_or(0, Vec::len)
    }

    /// Number of rooms that currently have at least one subscriber
    pub fn room_count(&self) -> usize {
        self.lock_rooms().len()
    }

    /// Total messages dropped because a subscriber's queue was full
    pub fn dropped_messages(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    fn lock_rooms(&self) -> MutexGuard<'_, HashMap<String, Vec<SubscriberHandle>>> {
        self.inner.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
