//! Game simulation - the fixed-timestep loop.
//!
//! The simulation is deterministic: all clients run it with the same
//! inputs and reach the same state.

use glam::Vec3;
use jetstride_physics::{ConfigError, MovementConfig, MovementEvents, PlayerController, WorldError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::PlayerInput;
use crate::level::Level;
use crate::player::{EntityId, Player};
use crate::prediction::PlayerSnapshot;

/// Errors raised while setting up a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build level: {0}")]
    Level(#[from] WorldError),

    #[error("tick rate must be positive")]
    ZeroTickRate,
}

/// Game simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Frame number the tick produced.
    pub frame: u64,

    /// Movement events per player, for players that raised any.
    pub events: Vec<(EntityId, MovementEvents)>,
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Number of ticks run so far.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// Movement physics controller.
    movement_controller: PlayerController,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, SimulationError> {
        if config.tick_rate == 0 {
            return Err(SimulationError::ZeroTickRate);
        }
        let movement_controller = PlayerController::new(config.movement.clone())?;

        Ok(Self {
            frame: 0,
            config,
            level,
            players: Vec::new(),
            movement_controller,
            next_entity_id: 1,
        })
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Result<Self, SimulationError> {
        Self::new(SimulationConfig::default(), Level::test_arena()?)
    }

    /// The controller every player is moved with.
    pub fn controller(&self) -> &PlayerController {
        &self.movement_controller
    }

    /// Add a player at the next spawn point.
    ///
    /// Returns the player's ID.
    pub fn add_player(&mut self, name: &str) -> EntityId {
        let spawn_index = self.players.len() % self.level.player_spawn_count().max(1);
        let spawn = self.level.get_player_spawn(spawn_index).copied();

        let position = spawn.map(|s| s.position).unwrap_or(Vec3::ZERO);
        let facing = spawn.map(|s| s.facing).unwrap_or(0.0);

        self.add_player_at(name, position, facing)
    }

    /// Add a player dropped onto the ground below `position`.
    pub fn add_player_at(&mut self, name: &str, position: Vec3, facing: f32) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let mut movement = self.movement_controller.new_state(position);
        movement.yaw = facing;
        self.movement_controller
            .spawn_at(&mut movement, position, &self.level.collision);

        log::debug!("player {id} ({name}) spawned at {:?}", movement.position);
        self.players.push(Player::new(id, name.to_string(), movement));
        id
    }

    /// Remove a player from the simulation.
    pub fn remove_player(&mut self, player_id: EntityId) {
        self.players.retain(|p| p.id != player_id);
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Snapshot every player at the current frame.
    pub fn snapshots(&self) -> Vec<(EntityId, PlayerSnapshot)> {
        self.players
            .iter()
            .map(|p| (p.id, p.snapshot(self.frame)))
            .collect()
    }

    /// Advance the simulation by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Player inputs indexed by player position in the `players` array
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> TickReport {
        let delta_time = self.config.delta_time();
        self.frame += 1;

        let mut report = TickReport {
            frame: self.frame,
            ..Default::default()
        };

        for (i, player) in self.players.iter_mut().enumerate() {
            // Missing input means no keys held.
            let input = inputs.get(i).cloned().unwrap_or_default();
            let command = input.to_command(self.config.mouse_sensitivity);

            let events = self.movement_controller.update(
                &mut player.movement,
                &command,
                &self.level.collision,
                delta_time,
            );
            if !events.is_empty() {
                log::trace!("player {} events: {:?}", player.id, events);
                report.events.push((player.id, events));
            }
        }

        report
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
