use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One immutable dice roll recorded in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEvent {
    pub actor: String,
    pub dice: String, // Normalized label, e.g. "d20"
    pub sides: u32,
    pub result: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub timestamp: DateTime<Utc>, // Whole seconds only
    pub time: String,             // HH:MM:SS for display
}

impl RollEvent {
    pub fn new(
        actor: String,
        sides: u32,
        result: u32,
        annotation: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);

        Self {
            actor,
            dice: format!("d{}", sides),
            sides,
            result,
            annotation,
            time: timestamp.format("%H:%M:%S").to_string(),
            timestamp,
        }
    }
}

/// In-memory room state: an append-only roll log behind the room's own lock
///
/// Each room carries its own guard so rolls in different rooms never contend.
#[derive(Debug)]
pub struct Room {
    id: String,
    log: Mutex<Vec<RollEvent>>,
}

impl Room {
    pub fn new(id: String) -> Self {
        Self {
            id,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Appends an event to the end of the log
    pub fn append_event(&self, event: RollEvent) {
        self.append_event_then(event, |_| ());
    }

    /// Appends an event and runs `after` on it while the log is still locked
    ///
    /// Anything `after` does is ordered exactly like the log itself. It must not
    /// block and must not touch this room's log.
    pub fn append_event_then<R>(&self, event: RollEvent, after: impl FnOnce(&RollEvent) -> R) -> R {
        let mut log = self.lock_log();
        log.push(event);
        let position = log.len();
        debug!(room_id = %self.id, position, "Event appended to room log");

        // The entry just pushed is always present
        after(&log[position - 1])
    }

    /// Point-in-time copy of the log in chronological order
    pub fn snapshot(&self) -> Vec<RollEvent> {
        self.lock_log().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_log(&self) -> MutexGuard<'_, Vec<RollEvent>> {
        // Every critical section leaves the vector consistent, so a poisoned
        // guard is still safe to use.
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
