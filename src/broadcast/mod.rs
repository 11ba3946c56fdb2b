// Live fan-out of room events to connected viewers
//
// The registry owns the producer side of every viewer's queue; each
// subscription owns the consumer side and deregisters itself on close.

// Public API - what other modules can use
pub use handlers::stream_events;
pub use registry::{BroadcastMessage, BroadcastRegistry, SubscriberId, DEFAULT_QUEUE_CAPACITY};
pub use subscription::{Subscription, SubscriptionState};

// Internal modules
mod handlers;
mod registry;
mod subscription;
