//! Thrust resource ("energy") and thrust acceleration.
//!
//! The resource drains while thrusting and recharges after a short delay.
//! Hitting zero trips a latch that keeps thrust unavailable until the
//! resource climbs back past a cutoff, so holding the button at the
//! threshold does not flicker thrust on and off.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::ThrustConfig;

/// Depletion latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrustLatch {
    /// Thrust may be used while any resource remains.
    #[default]
    Armed,
    /// The resource ran out; thrust stays off until it recharges past the
    /// re-arm threshold.
    Depleted,
}

/// Outcome of a recharge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RechargeOutcome {
    /// Nothing changed state.
    Idle,
    /// The latch went from depleted back to armed.
    Rearmed,
}

/// Bounded, rechargeable thrust resource.
///
/// Part of the replicated actor state: prediction rolls it back and
/// replays it together with position and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustResource {
    /// Current level in `[0, max_energy]`.
    pub energy: f32,
    /// Depletion latch.
    pub latch: ThrustLatch,
    /// Seconds left before recharging resumes.
    pub recharge_cooldown: f32,
}

impl Default for ThrustResource {
    fn default() -> Self {
        Self::new(ThrustConfig::default().max_energy)
    }
}

impl ThrustResource {
    /// A full, armed resource.
    pub fn new(max_energy: f32) -> Self {
        Self {
            energy: max_energy,
            latch: ThrustLatch::Armed,
            recharge_cooldown: 0.0,
        }
    }

    /// Check whether thrust may be applied right now.
    #[inline]
    pub fn can_thrust(&self) -> bool {
        self.energy > 0.0 && self.latch == ThrustLatch::Armed
    }

    /// Check whether the depletion latch is set.
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.latch == ThrustLatch::Depleted
    }

    /// Drain `requested` energy.
    ///
    /// Returns the fraction of the request that was available. If the
    /// request empties the resource, only the remainder is drained and the
    /// latch trips.
    pub fn drain(&mut self, requested: f32) -> f32 {
        if !self.can_thrust() {
            return 0.0;
        }
        if requested <= 0.0 {
            return 1.0;
        }

        if requested >= self.energy {
            let fraction = self.energy / requested;
            self.energy = 0.0;
            self.latch = ThrustLatch::Depleted;
            log::debug!("thrust depleted");
            fraction
        } else {
            self.energy -= requested;
            1.0
        }
    }

    /// Advance the recharge timer and refill.
    ///
    /// `used` says whether thrust was applied this tick; using it restarts
    /// the recharge delay.
    pub fn recharge(&mut self, delta_time: f32, used: bool, config: &ThrustConfig) -> RechargeOutcome {
        if used {
            self.recharge_cooldown = config.recharge_delay;
            return RechargeOutcome::Idle;
        }

        if self.recharge_cooldown > 0.0 {
            self.recharge_cooldown = (self.recharge_cooldown - delta_time).max(0.0);
        } else {
            self.energy = (self.energy + config.charge_rate * delta_time).min(config.max_energy);
        }

        if self.is_depleted() && self.energy > config.rearm_threshold {
            self.latch = ThrustLatch::Armed;
            log::debug!("thrust re-armed at {:.1}", self.energy);
            return RechargeOutcome::Rearmed;
        }

        RechargeOutcome::Idle
    }
}

/// Acceleration produced by full thrust.
///
/// Part of the thrust goes sideways toward the input direction. That share
/// shrinks from `max_side_fraction` at rest to nothing as speed along the
/// input reaches `max_forward_speed`. The rest goes straight up so the
/// total magnitude stays constant.
pub fn thrust_acceleration(wish_direction: Vec3, velocity: Vec3, config: &ThrustConfig) -> Vec3 {
    let wish = Vec3::new(wish_direction.x, 0.0, wish_direction.z).normalize_or_zero();

    let side = if wish == Vec3::ZERO {
        0.0
    } else {
        let forward_speed = velocity.dot(wish);
        let t = (forward_speed / config.max_forward_speed).clamp(0.0, 1.0);
        config.max_side_fraction * (1.0 - t)
    };

    let up = (1.0 - side * side).max(0.0).sqrt();
    (wish * side + Vec3::Y * up) * config.acceleration
}
