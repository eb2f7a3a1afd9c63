//! Jetstride Game Logic
//!
//! This crate wraps the movement controller in a playable simulation:
//!
//! - Keyboard-and-mouse input mapped to movement commands
//! - Players and levels
//! - A fixed-timestep tick that reports movement events
//! - Replicated snapshots and client-side prediction replay
//!
//! # Architecture
//!
//! The simulation is deterministic and driven only by input commands and a
//! fixed timestep, so a client can predict ahead and re-run its pending
//! commands whenever the server corrects it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌─────────┐    ┌────────────┐    ┌────────────────────────┐ │
//! │  │ Input   │───►│ Movement   │───►│ Players, events,       │ │
//! │  │ Commands│    │ controller │    │ snapshots              │ │
//! │  └─────────┘    └────────────┘    └───────────┬────────────┘ │
//! │                                               ▼              │
//! │                                     Prediction::reconcile    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod level;
pub mod player;
pub mod prediction;
pub mod simulation;

// Re-export main types
pub use input::PlayerInput;
pub use level::Level;
pub use player::{EntityId, Player};
pub use prediction::{PlayerSnapshot, Prediction};
pub use simulation::{Simulation, SimulationConfig, SimulationError, TickReport};

// Re-export physics types for convenience
pub use jetstride_physics::{
    CollisionWorld, ContentFlags, MovementConfig, MovementEvent, MovementEvents, MovementState,
    PlayerCommand, PlayerController,
};
