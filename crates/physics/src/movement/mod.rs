//! Actor movement physics.
//!
//! This module implements a kinematic capsule controller with:
//!
//! - Iterative clip-and-slide collision response
//! - Clipping-normal correction for capsule contacts on sharp edges
//! - Stair stepping
//! - Ground detection and adherence
//! - Friction, ground and air acceleration, jumping
//! - A rechargeable thrust resource
//!
//! # Design
//!
//! Movement is driven by the [`PlayerController`], which takes an input
//! command and advances a [`MovementState`] against any [`SweepQuery`]
//! backend.
//!
//! All movement is deterministic: scratch data such as the previous
//! contact normal lives only inside one resolution, so restoring a state
//! and replaying the same commands reproduces the same ticks.
//!
//! [`SweepQuery`]: crate::collision::SweepQuery

mod clip_normal;
mod config;
mod context;
mod controller;
mod events;
mod ground;
mod jump;
mod slide_move;
mod state;
mod step;
mod thrust;

#[cfg(test)]
pub(crate) mod testing;

pub use clip_normal::{clipping_normal, NormalBias};
pub use config::{ConfigError, MovementConfig, ThrustConfig};
pub use context::MoveContext;
pub use controller::PlayerController;
pub use events::{MovementEvent, MovementEvents};
pub use ground::{stay_on_ground, update_ground, GroundState};
pub use jump::JumpState;
pub use slide_move::{clip_velocity, resolve, MoveState};
pub use state::{
    forward_from_yaw, right_from_yaw, CommandButtons, MovementFlags, MovementState, PlayerCommand,
};
pub use step::try_step;
pub use thrust::{thrust_acceleration, RechargeOutcome, ThrustLatch, ThrustResource};
