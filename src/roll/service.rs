use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

use super::dice::DiceSpec;
use crate::{
    broadcast::BroadcastRegistry,
    room::{RollEvent, RoomService},
    session::Actor,
    shared::AppError,
};

/// Records dice rolls in a room and fans them out to the room's viewers
pub struct RollService {
    room_service: Arc<RoomService>,
    broadcast_registry: BroadcastRegistry,
    rng: Mutex<StdRng>,
}

impl RollService {
    /// Creates the service with a random source seeded once from the OS
    pub fn new(room_service: Arc<RoomService>, broadcast_registry: BroadcastRegistry) -> Self {
        Self::with_rng(room_service, broadcast_registry, StdRng::from_os_rng())
    }

    /// Creates the service with a reproducible random source
    pub fn with_seed(
        room_service: Arc<RoomService>,
        broadcast_registry: BroadcastRegistry,
        seed: u64,
    ) -> Self {
        Self::with_rng(room_service, broadcast_registry, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        room_service: Arc<RoomService>,
        broadcast_registry: BroadcastRegistry,
        rng: StdRng,
    ) -> Self {
        Self {
            room_service,
            broadcast_registry,
            rng: Mutex::new(rng),
        }
    }

    /// Rolls a die for `actor` in `room_id`
    ///
    /// The event is appended to the room log before it is published, and both
    /// happen under the room's lock, so viewers see events in log order.
    #[instrument(skip(self, actor))]
    pub async fn submit_roll(
        &self,
        room_id: &str,
        actor: Option<&Actor>,
        dice_spec: Option<&str>,
        annotation: Option<&str>,
    ) -> Result<RollEvent, AppError> {
        let actor =
            actor.ok_or_else(|| AppError::Unauthorized("You must join first".to_string()))?;
        let room = self.room_service.get_room(room_id).await?;

        let dice = DiceSpec::parse(dice_spec);
        let result = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            dice.roll(&mut *rng)
        };
        debug!(room_id = %room_id, dice = %dice, result, "Dice rolled");

        let annotation = annotation
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        let event = RollEvent::new(
            actor.name().to_string(),
            dice.sides(),
            result,
            annotation,
            Utc::now(),
        );

        let message = serde_json::to_string(&event)
            .map_err(|e| AppError::Internal(format!("Failed to serialize roll: {}", e)))?;

        let delivered = room.append_event_then(event.clone(), |_| {
            self.broadcast_registry.publish(room_id, message)
        });

        info!(
            room_id = %room_id,
            actor = %event.actor,
            dice = %event.dice,
            result = event.result,
            delivered,
            "Roll recorded"
        );

        Ok(event)
    }
}
