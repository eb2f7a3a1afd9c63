//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning, including the
//! feel constants (separation speeds, overclip) that differ between games.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::TraceShape;

/// Errors raised when a movement configuration cannot drive an actor.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The capsule has a non-positive radius or is shorter than a sphere.
    #[error("invalid actor capsule: radius {radius}, height {height}")]
    InvalidShape { radius: f32, height: f32 },

    /// A named field holds a value outside its legal range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    /// The TOML source could not be parsed.
    #[error("failed to parse movement config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for actor movement physics.
///
/// All values use metric units (meters, seconds) unless otherwise noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Actor Dimensions
    // ========================================================================
    /// Collision radius (meters).
    pub actor_radius: f32,

    /// Capsule height, bottom of the lower cap to top of the upper cap.
    pub actor_height: f32,

    // ========================================================================
    // Locomotion
    // ========================================================================
    /// Top speed reachable by input acceleration (meters/second).
    pub max_speed: f32,

    /// Ground acceleration constant (fraction of max speed per second).
    pub ground_acceleration: f32,

    /// Air acceleration constant (fraction of max speed per second).
    pub air_acceleration: f32,

    /// Ground friction coefficient.
    pub friction: f32,

    /// Speed floor used by friction so slow actors stop quickly.
    pub stop_speed: f32,

    /// Speed ceiling used by friction so fast actors slide.
    pub slip_speed: f32,

    /// Gravity acceleration (meters/second²).
    pub gravity: f32,

    /// Jump launch speed along up (meters/second).
    pub jump_velocity: f32,

    /// Minimum time between jumps (milliseconds).
    pub jump_cooldown_ms: u32,

    // ========================================================================
    // Ground
    // ========================================================================
    /// Minimum surface normal Y to count as ground (cos of walkable angle).
    /// 0.7 ≈ 45 degrees.
    pub min_ground_normal: f32,

    /// Length of the downward ground probe (meters).
    pub ground_probe_distance: f32,

    /// Separation speed along the ground normal above which the actor
    /// leaves the ground.
    pub ground_separation_speed: f32,

    /// Stricter separation speed used while thrusting.
    pub thrust_separation_speed: f32,

    /// How far `stay_on_ground` probes up before probing down (meters).
    pub ground_snap_lift: f32,

    // ========================================================================
    // Stairs and Steps
    // ========================================================================
    /// Maximum step height the actor can climb (meters).
    pub step_height: f32,

    /// Normal Y below which an obstruction is treated as a step riser,
    /// and at or above which a tread counts as a landing.
    pub min_step_normal: f32,

    /// How far past the contact the step probe looks into the wall (meters).
    pub step_probe_depth: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Maximum sweep-clip iterations per resolution.
    pub max_iterations: usize,

    /// Extra speed pushed away from a surface when clipping (meters/second).
    /// Zero gives the strict clip rule.
    pub overclip: f32,

    /// How far past the contact point the clipping-normal probe aims,
    /// over the edge for sliding or under it for step detection (meters).
    pub normal_probe_bias: f32,

    /// Extra length of the clipping-normal probe ray past its target.
    pub normal_probe_margin: f32,

    /// Thrust resource and acceleration.
    pub thrust: ThrustConfig,
}

/// Thrust ("energy") tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustConfig {
    /// Capacity of the resource.
    pub max_energy: f32,

    /// Drain per second while thrusting.
    pub drain_rate: f32,

    /// Recharge per second once the delay has elapsed.
    pub charge_rate: f32,

    /// Time after the last thrust before recharging starts (seconds).
    pub recharge_delay: f32,

    /// Level the resource must exceed to re-arm after depletion.
    pub rearm_threshold: f32,

    /// Thrust acceleration magnitude (meters/second²).
    pub acceleration: f32,

    /// Forward speed at which the sideways share of thrust saturates.
    pub max_forward_speed: f32,

    /// Largest share of thrust that may be directed along the input.
    pub max_side_fraction: f32,
}

impl Default for ThrustConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            drain_rate: 40.0,
            charge_rate: 25.0,
            recharge_delay: 0.5,
            rearm_threshold: 20.0,
            acceleration: 22.0,
            max_forward_speed: 9.0,
            max_side_fraction: 0.6,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            actor_radius: 0.4,
            actor_height: 1.8,

            max_speed: 7.0,
            ground_acceleration: 10.0,
            air_acceleration: 1.5,
            friction: 6.0,
            stop_speed: 1.0,
            slip_speed: 12.0,
            gravity: 15.0,
            jump_velocity: 5.5,
            jump_cooldown_ms: 200,

            min_ground_normal: 0.7,
            ground_probe_distance: 0.06,
            ground_separation_speed: 1.0,
            thrust_separation_speed: 0.0,
            ground_snap_lift: 0.05,

            step_height: 0.4,
            min_step_normal: 0.7,
            step_probe_depth: 0.05,

            max_iterations: 8,
            overclip: 0.0,
            normal_probe_bias: 0.05,
            normal_probe_margin: 0.02,

            thrust: ThrustConfig::default(),
        }
    }
}

impl MovementConfig {
    /// Create a "fast arcade" config: quick acceleration, strong thrust.
    pub fn arcade() -> Self {
        Self {
            max_speed: 10.0,
            ground_acceleration: 15.0,
            air_acceleration: 3.0,
            gravity: 20.0,
            jump_velocity: 6.5,
            jump_cooldown_ms: 100,
            thrust: ThrustConfig {
                acceleration: 30.0,
                drain_rate: 30.0,
                ..ThrustConfig::default()
            },
            ..Default::default()
        }
    }

    /// Create a "heavy" config: sluggish, grippy, short thrust bursts.
    pub fn heavy() -> Self {
        Self {
            max_speed: 5.0,
            ground_acceleration: 8.0,
            air_acceleration: 0.5,
            friction: 8.0,
            gravity: 18.0,
            jump_velocity: 4.5,
            jump_cooldown_ms: 300,
            overclip: 0.01,
            thrust: ThrustConfig {
                max_energy: 60.0,
                drain_rate: 50.0,
                recharge_delay: 1.0,
                ..ThrustConfig::default()
            },
            ..Default::default()
        }
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// The actor's collision capsule.
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.actor_radius,
            height: self.actor_height,
        }
    }

    /// Check that this config can drive an actor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.actor_radius > 0.0) || !(self.actor_height >= 2.0 * self.actor_radius) {
            return Err(ConfigError::InvalidShape {
                radius: self.actor_radius,
                height: self.actor_height,
            });
        }

        let unit_range = [
            ("min_ground_normal", self.min_ground_normal),
            ("min_step_normal", self.min_step_normal),
            ("thrust.max_side_fraction", self.thrust.max_side_fraction),
        ];
        for (field, value) in unit_range {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let positive = [
            ("max_speed", self.max_speed),
            ("gravity", self.gravity),
            ("ground_probe_distance", self.ground_probe_distance),
            ("step_height", self.step_height),
            ("thrust.max_energy", self.thrust.max_energy),
            ("thrust.max_forward_speed", self.thrust.max_forward_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("friction", self.friction),
            ("stop_speed", self.stop_speed),
            ("overclip", self.overclip),
            ("normal_probe_bias", self.normal_probe_bias),
            ("thrust.drain_rate", self.thrust.drain_rate),
            ("thrust.charge_rate", self.thrust.charge_rate),
            ("thrust.recharge_delay", self.thrust.recharge_delay),
            ("thrust.acceleration", self.thrust.acceleration),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.slip_speed < self.stop_speed {
            return Err(ConfigError::OutOfRange {
                field: "slip_speed",
                value: self.slip_speed,
            });
        }
        if !(0.0..=self.thrust.max_energy).contains(&self.thrust.rearm_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "thrust.rearm_threshold",
                value: self.thrust.rearm_threshold,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_iterations",
                value: 0.0,
            });
        }

        Ok(())
    }
}
