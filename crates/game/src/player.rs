//! Player entities.

use glam::Vec3;
use jetstride_physics::MovementState;

use crate::prediction::PlayerSnapshot;

/// Unique identifier for players in the simulation.
pub type EntityId = u32;

/// A player in the simulation.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier.
    pub id: EntityId,

    /// Display name.
    pub name: String,

    /// Kinematic state driven by the movement controller.
    pub movement: MovementState,
}

impl Player {
    /// Create a new player with the given movement state.
    pub fn new(id: EntityId, name: String, movement: MovementState) -> Self {
        Self {
            id,
            name,
            movement,
        }
    }

    /// Get the player's position (bottom of the capsule).
    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    /// Check if the player is standing on walkable ground.
    pub fn is_on_ground(&self) -> bool {
        self.movement.flags.on_ground()
    }

    /// Remaining thrust energy.
    pub fn energy(&self) -> f32 {
        self.movement.thrust.energy
    }

    /// Capture the replicated state of this player.
    pub fn snapshot(&self, frame: u64) -> PlayerSnapshot {
        PlayerSnapshot::capture(frame, &self.movement)
    }
}
