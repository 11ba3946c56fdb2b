use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for generating room identifiers
#[async_trait]
pub trait RoomIdGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Generates compact room ids from a nanosecond clock encoded in base 36
///
/// The clock reading is forced to be strictly increasing, so two calls never
/// return the same id even when the wall clock stalls or steps backwards.
pub struct ClockRoomIdGenerator {
    last: AtomicU64,
}

impl ClockRoomIdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    fn next_tick(&self) -> u64 {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .map(|nanos| nanos.max(0) as u64)
            .unwrap_or(0);

        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(observed) => last = observed,
            }
        }
    }
}

impl Default for ClockRoomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomIdGenerator for ClockRoomIdGenerator {
    async fn generate(&self) -> String {
        encode_base36(self.next_tick())
    }
}

fn encode_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::with_capacity(13);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
