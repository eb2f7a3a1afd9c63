//! Collision detection for kinematic movement.
//!
//! This module provides world collision testing using capsule, box and
//! point shapes.
//!
//! # Key Types
//!
//! - [`SweepQuery`]: The capability movement code is written against
//! - [`CollisionWorld`]: A parry3d-backed implementation of it
//! - [`TraceResult`]: Output from a collision trace
//! - [`TraceShape`]: Shape used for tracing (capsule, box or point)
//!
//! # Tracing
//!
//! Traces sweep a shape through the world and return:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - The final position, backed off slightly from any contact
//! - Surface normal at impact (if any)
//! - Whether the shape started inside solid geometry
//! - Which brush was hit

mod flags;
mod query;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use query::{SweepQuery, TraceFilter};
pub use trace::{BrushId, TraceResult, TraceShape};
pub use world::{CollisionBrush, CollisionWorld, WorldError, SKIN_DISTANCE};
