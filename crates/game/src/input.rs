//! Player input handling.
//!
//! Converts keyboard-and-mouse style input into [`PlayerCommand`]s for
//! the movement controller.

use jetstride_physics::movement::{CommandButtons, PlayerCommand};
use serde::{Deserialize, Serialize};

/// Mouse pixels to radians at sensitivity 1.0.
const RADIANS_PER_PIXEL: f32 = 0.001;

/// Raw player input for a single frame.
///
/// This is the input format received from the client input system.
/// It gets converted to [`PlayerCommand`] for the movement controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Horizontal mouse movement this frame (pixels).
    pub mouse_delta_x: f32,

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u64,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub thrust: bool,
}

impl PlayerInput {
    /// Convert to a movement command.
    ///
    /// # Arguments
    ///
    /// * `mouse_sensitivity` - Mouse sensitivity multiplier
    pub fn to_command(&self, mouse_sensitivity: f32) -> PlayerCommand {
        let mut cmd = PlayerCommand::default();

        if self.movement.forward {
            cmd.forward_move += 1.0;
        }
        if self.movement.backward {
            cmd.forward_move -= 1.0;
        }
        if self.movement.right {
            cmd.right_move += 1.0;
        }
        if self.movement.left {
            cmd.right_move -= 1.0;
        }

        // Normalize diagonal movement
        let move_magnitude = (cmd.forward_move.powi(2) + cmd.right_move.powi(2)).sqrt();
        if move_magnitude > 1.0 {
            cmd.forward_move /= move_magnitude;
            cmd.right_move /= move_magnitude;
        }

        // Mouse right turns right, which increases yaw.
        cmd.yaw_delta = self.mouse_delta_x * mouse_sensitivity * RADIANS_PER_PIXEL;

        if self.actions.jump {
            cmd.buttons.press(CommandButtons::JUMP);
        }
        if self.actions.thrust {
            cmd.buttons.press(CommandButtons::THRUST);
        }

        cmd
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }
}
