//! Actor kinematic state and input commands.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::BrushId;

use super::jump::JumpState;
use super::thrust::ThrustResource;

/// Flags describing the actor's current movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFlags(pub u16);

impl MovementFlags {
    /// Actor is standing on walkable ground.
    pub const ON_GROUND: u16 = 1 << 0;

    /// Thrust was applied during the last tick.
    pub const THRUSTING: u16 = 1 << 1;

    /// Actor is frozen (can't move).
    pub const FROZEN: u16 = 1 << 2;

    /// Check if a flag is set.
    #[inline]
    pub fn has(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u16, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Check if the actor is on the ground.
    #[inline]
    pub fn on_ground(self) -> bool {
        self.has(Self::ON_GROUND)
    }

    /// Check if the actor was thrusting last tick.
    #[inline]
    pub fn thrusting(self) -> bool {
        self.has(Self::THRUSTING)
    }

    /// Check if the actor can move.
    #[inline]
    pub fn can_move(self) -> bool {
        !self.has(Self::FROZEN)
    }
}

/// Complete kinematic state of one actor.
///
/// This is everything a tick reads and writes. It holds no solver
/// scratch data, so restoring a copy and replaying the same commands
/// reproduces the same ticks exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Position in world space (bottom of the capsule).
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// View yaw in radians, `-PI..=PI`. Zero faces +X.
    pub yaw: f32,

    /// Movement state flags.
    pub flags: MovementFlags,

    /// Brush the actor stands on, if grounded.
    pub ground_entity: Option<BrushId>,

    /// Ground surface normal (up while airborne).
    pub ground_normal: Vec3,

    /// Thrust resource.
    pub thrust: ThrustResource,

    /// Jump cooldown and edge detection.
    pub jump: JumpState,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            flags: MovementFlags::default(),
            ground_entity: None,
            ground_normal: Vec3::Y,
            thrust: ThrustResource::default(),
            jump: JumpState::default(),
        }
    }
}

impl MovementState {
    /// Create a new movement state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a state with a thrust resource sized for `max_energy`.
    pub fn with_thrust(position: Vec3, max_energy: f32) -> Self {
        Self {
            position,
            thrust: ThrustResource::new(max_energy),
            ..Default::default()
        }
    }

    /// Get the forward direction from yaw (horizontal only).
    pub fn forward_direction(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Get the right direction from yaw (horizontal only).
    pub fn right_direction(&self) -> Vec3 {
        right_from_yaw(self.yaw)
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Forward direction for a yaw angle.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(cos_yaw, 0.0, sin_yaw)
}

/// Right direction for a yaw angle.
#[inline]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(-sin_yaw, 0.0, cos_yaw)
}

/// Input command from the player for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Forward/backward movement (-1.0 to 1.0).
    /// Positive = forward, negative = backward.
    pub forward_move: f32,

    /// Strafe left/right (-1.0 to 1.0).
    /// Positive = right, negative = left.
    pub right_move: f32,

    /// Yaw change this tick (radians).
    pub yaw_delta: f32,

    /// Button states.
    pub buttons: CommandButtons,
}

/// Button state flags for player commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButtons(pub u8);

impl CommandButtons {
    /// Jump button.
    pub const JUMP: u8 = 1 << 0;

    /// Thrust button.
    pub const THRUST: u8 = 1 << 1;

    /// Check if a button is pressed.
    #[inline]
    pub fn pressed(self, button: u8) -> bool {
        (self.0 & button) != 0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, button: u8) {
        self.0 |= button;
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, button: u8) {
        self.0 &= !button;
    }
}

impl PlayerCommand {
    /// Check if jump is requested.
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.buttons.pressed(CommandButtons::JUMP)
    }

    /// Check if thrust is requested.
    #[inline]
    pub fn wants_thrust(&self) -> bool {
        self.buttons.pressed(CommandButtons::THRUST)
    }

    /// Check if any movement input is active.
    #[inline]
    pub fn has_movement_input(&self) -> bool {
        self.forward_move.abs() > 0.01 || self.right_move.abs() > 0.01
    }

    /// World-space wish direction and input magnitude for a view yaw.
    ///
    /// The direction is horizontal and unit length, or zero without input.
    /// The magnitude is in `[0, 1]` so analog input walks slower.
    pub fn wish_direction(&self, yaw: f32) -> (Vec3, f32) {
        let wish = forward_from_yaw(yaw) * self.forward_move + right_from_yaw(yaw) * self.right_move;

        let length_squared = wish.length_squared();
        if length_squared < 1.0e-4 {
            return (Vec3::ZERO, 0.0);
        }

        let magnitude = self.forward_move.abs().max(self.right_move.abs()).min(1.0);
        (wish / length_squared.sqrt(), magnitude)
    }
}
