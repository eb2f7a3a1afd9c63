//! Jump state management.
//!
//! Jumping is edge-triggered: holding the button jumps once. A cooldown
//! after each jump keeps a held or mashed button from chaining jumps on
//! the landing tick.

use serde::{Deserialize, Serialize};

/// Jump cooldown and input edge tracking.
///
/// Replicated with the rest of the actor state so that replays reproduce
/// the same jumps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpState {
    /// Time remaining on jump cooldown (ms). Can't jump while > 0.
    cooldown_ms: u32,

    /// Previous tick's jump input (for edge detection).
    prev_pressed: bool,
}

impl JumpState {
    /// Create a new jump state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update for this tick and report whether to jump.
    ///
    /// # Arguments
    ///
    /// * `pressed` - Whether the jump button is currently held
    /// * `on_ground` - Whether the actor is grounded this tick
    /// * `cooldown_ms` - Cooldown to start after a jump
    /// * `delta_time_ms` - Tick length in milliseconds
    pub fn update(&mut self, pressed: bool, on_ground: bool, cooldown_ms: u32, delta_time_ms: u32) -> bool {
        let just_pressed = pressed && !self.prev_pressed;
        self.prev_pressed = pressed;

        self.cooldown_ms = self.cooldown_ms.saturating_sub(delta_time_ms);

        let should_jump = just_pressed && on_ground && self.cooldown_ms == 0;
        if should_jump {
            self.cooldown_ms = cooldown_ms;
        }

        should_jump
    }

    /// Check if jump is on cooldown.
    pub fn on_cooldown(&self) -> bool {
        self.cooldown_ms > 0
    }

    /// Get remaining cooldown time in milliseconds.
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_ms
    }
}
