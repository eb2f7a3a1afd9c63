//! Jetstride Physics
//!
//! A deterministic kinematic character controller: a capsule walks,
//! slides, climbs stairs, jumps and thrusts through static world geometry
//! using swept collision queries instead of rigid-body simulation.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: sweeps capsules, boxes and rays through the world and
//!   returns hit information, behind the [`SweepQuery`] trait
//! - **Movement**: uses those sweeps to implement actor locomotion
//!
//! # Design Principles
//!
//! 1. **Determinism**: same state and inputs always produce the same tick
//! 2. **Stability**: edges, corners and stairs resolve without jitter
//! 3. **Replaceable geometry**: movement only sees [`SweepQuery`]

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    BrushId, CollisionWorld, ContentFlags, SweepQuery, TraceFilter, TraceResult, TraceShape,
    WorldError,
};
pub use movement::{
    CommandButtons, ConfigError, MovementConfig, MovementEvent, MovementEvents, MovementFlags,
    MovementState, PlayerCommand, PlayerController, ThrustConfig, ThrustResource,
};
