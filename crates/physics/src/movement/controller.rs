//! Player movement controller.
//!
//! This is the main entry point for actor movement. It turns one input
//! command into one tick of locomotion: thrust, gravity, ground probe,
//! jump, friction and acceleration, then hands the velocity to the slide
//! resolver and snaps the result back onto the ground.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::collision::SweepQuery;

use super::config::{ConfigError, MovementConfig};
use super::context::MoveContext;
use super::events::{MovementEvent, MovementEvents};
use super::ground::{stay_on_ground, update_ground, GroundState};
use super::slide_move::{clip_velocity, resolve, MoveState};
use super::state::{MovementFlags, MovementState, PlayerCommand};
use super::thrust::{thrust_acceleration, RechargeOutcome};

/// Longest tick simulated in one step (seconds).
const MAX_DELTA_TIME: f32 = 0.1;

/// Speed below which grounded friction stops the actor outright.
const STOP_EPSILON: f32 = 1.0e-3;

/// How far above a spawn point the spawn probe starts.
const SPAWN_PROBE_UP: f32 = 1.0;

/// How far below a spawn point the spawn probe reaches.
const SPAWN_PROBE_DOWN: f32 = 2.0;

/// Player movement controller.
///
/// Holds only configuration; all per-actor state lives in
/// [`MovementState`], so one controller drives any number of actors.
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(MovementConfig::default())?;
/// let mut state = controller.new_state(spawn_position);
///
/// // Each tick:
/// let events = controller.update(&mut state, &command, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: MovementConfig,
}

impl PlayerController {
    /// Create a controller, rejecting configs that cannot drive an actor.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: MovementConfig::default(),
        }
    }

    /// Movement configuration.
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// A fresh state at `position` with a full thrust resource.
    pub fn new_state(&self, position: Vec3) -> MovementState {
        MovementState::with_thrust(position, self.config.thrust.max_energy)
    }

    /// Place an actor at a spawn point.
    ///
    /// Drops the capsule from just above `spawn_pos` onto the ground below
    /// it. Velocity, thrust and jump state are reset; yaw is kept.
    pub fn spawn_at<Q>(&self, state: &mut MovementState, spawn_pos: Vec3, world: &Q)
    where
        Q: SweepQuery + ?Sized,
    {
        let ctx = MoveContext::new(world, &self.config);
        let yaw = state.yaw;
        *state = self.new_state(spawn_pos);
        state.yaw = yaw;

        let trace = ctx.sweep(
            spawn_pos + Vec3::Y * SPAWN_PROBE_UP,
            spawn_pos - Vec3::Y * SPAWN_PROBE_DOWN,
        );
        if !trace.hit_something() || trace.started_in_solid {
            log::debug!("no ground below spawn {spawn_pos:?}");
            return;
        }

        state.position = trace.end_position;
        let ground = update_ground(&ctx, state.position, Vec3::ZERO, false);
        apply_ground(state, &ground);
    }

    /// Advance one actor by one tick.
    ///
    /// Returns the events raised during this tick.
    pub fn update<Q>(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &Q,
        delta_time: f32,
    ) -> MovementEvents
    where
        Q: SweepQuery + ?Sized,
    {
        let mut events = MovementEvents::new();

        if !state.flags.can_move() {
            return events;
        }

        // Rejects NaN as well as zero and negative steps.
        if !(delta_time > 0.0) {
            return events;
        }
        let delta_time = delta_time.min(MAX_DELTA_TIME);

        let config = &self.config;
        let ctx = MoveContext::new(world, config);

        update_yaw(state, command);

        if !self.unstick(&ctx, state) {
            return events;
        }

        let was_grounded = state.flags.on_ground();
        let was_thrusting = state.flags.thrusting();
        let (wish_direction, input_magnitude) = command.wish_direction(state.yaw);
        let wish_speed = config.max_speed * input_magnitude;

        // Thrust
        let mut other_acceleration = Vec3::ZERO;
        let mut thrusting = false;
        if command.wants_thrust() && state.thrust.can_thrust() {
            let fraction = state.thrust.drain(config.thrust.drain_rate * delta_time);
            let acceleration =
                thrust_acceleration(wish_direction, state.velocity, &config.thrust) * fraction;
            state.velocity += acceleration * delta_time;
            other_acceleration += acceleration;
            thrusting = fraction > 0.0;

            if state.thrust.is_depleted() {
                events.insert(MovementEvent::ThrustDepleted);
            }
        }

        if thrusting && !was_thrusting {
            events.insert(MovementEvent::ThrustStart);
        } else if !thrusting && was_thrusting && !state.thrust.is_depleted() {
            events.insert(MovementEvent::ThrustStop);
        }

        if state.thrust.recharge(delta_time, thrusting, &config.thrust) == RechargeOutcome::Rearmed {
            events.insert(MovementEvent::ThrustReady);
        }

        state.velocity.y -= config.gravity * delta_time;

        let mut ground = update_ground(&ctx, state.position, state.velocity, thrusting);

        // Jump
        let delta_time_ms = (delta_time * 1000.0).round() as u32;
        let jumped = state.jump.update(
            command.wants_jump(),
            ground.grounded,
            config.jump_cooldown_ms,
            delta_time_ms,
        );
        if jumped {
            state.velocity.y = state.velocity.y.max(0.0) + config.jump_velocity;
            ground.leave();
            events.insert(MovementEvent::Jump);
        }

        if ground.grounded {
            state.velocity = clip_velocity(state.velocity, ground.normal, 0.0);
            self.apply_friction(state, ground.normal, other_acceleration, delta_time);

            let along_ground = clip_velocity(wish_direction, ground.normal, 0.0).normalize_or_zero();
            self.accelerate(state, along_ground, wish_speed, config.ground_acceleration, delta_time);
        } else {
            self.accelerate(state, wish_direction, wish_speed, config.air_acceleration, delta_time);
        }

        let mut move_state = MoveState::new(state.position, state.velocity);
        let fraction = resolve(&ctx, &mut move_state, delta_time, ground.grounded, config.max_iterations);

        if move_state.stepped {
            events.insert(MovementEvent::Step);
        }
        if ground.grounded && !ground.holds(move_state.velocity, thrusting, config) {
            ground.leave();
        }

        // Clipped velocity is kept even when the move was fully blocked.
        state.velocity = move_state.velocity;
        if fraction > 0.0 {
            state.position = move_state.position;
            if ground.grounded {
                state.position = stay_on_ground(&ctx, state.position);
            }
        }

        state.flags.set(MovementFlags::THRUSTING, thrusting);
        apply_ground(state, &ground);

        if ground.grounded && !was_grounded {
            log::debug!("landed at {:?}", state.position);
            events.insert(MovementEvent::Grounded);
        } else if !ground.grounded && was_grounded && !jumped {
            events.insert(MovementEvent::Airborne);
        }

        events
    }

    // ========================================================================
    // Stuck Recovery
    // ========================================================================

    /// Make sure the capsule starts the tick outside geometry.
    ///
    /// Tries a fixed list of nudges and takes the first clear one. Returns
    /// false if the actor is still stuck and should not move this tick.
    fn unstick<Q>(&self, ctx: &MoveContext<'_, Q>, state: &mut MovementState) -> bool
    where
        Q: SweepQuery + ?Sized,
    {
        if !ctx.overlaps(state.position) {
            return true;
        }

        let step = self.config.step_height;
        let side = self.config.actor_radius;
        let nudges = [
            Vec3::Y * step,
            Vec3::X * side,
            Vec3::NEG_X * side,
            Vec3::Z * side,
            Vec3::NEG_Z * side,
            Vec3::Y * (step * 2.0),
            Vec3::NEG_Y * step,
        ];

        for nudge in nudges {
            let candidate = state.position + nudge;
            if !ctx.overlaps(candidate) {
                log::debug!("unstuck {:?} by {:?}", state.position, nudge);
                state.position = candidate;
                return true;
            }
        }

        log::debug!("stuck at {:?}", state.position);
        false
    }

    // ========================================================================
    // Locomotion
    // ========================================================================

    fn apply_friction(
        &self,
        state: &mut MovementState,
        ground_normal: Vec3,
        other_acceleration: Vec3,
        delta_time: f32,
    ) {
        let speed = state.velocity.length();
        if speed < STOP_EPSILON {
            state.velocity = Vec3::ZERO;
            return;
        }

        // Whatever pushes the actor away from the ground takes grip away.
        let gravity = Vec3::NEG_Y * self.config.gravity;
        let traction = (-(gravity + other_acceleration).dot(ground_normal) / self.config.gravity).max(0.0);

        let control = speed.clamp(self.config.stop_speed, self.config.slip_speed);
        let drop = control * self.config.friction * traction * delta_time;

        let new_speed = (speed - drop).max(0.0);
        state.velocity *= new_speed / speed;
    }

    fn accelerate(
        &self,
        state: &mut MovementState,
        wish_direction: Vec3,
        wish_speed: f32,
        acceleration: f32,
        delta_time: f32,
    ) {
        if wish_direction.length_squared() < 1.0e-4 {
            return;
        }

        let current_speed = state.velocity.dot(wish_direction);
        let add_speed = wish_speed - current_speed;
        if add_speed <= 0.0 {
            return;
        }

        let accel_speed = (acceleration * self.config.max_speed * delta_time).min(add_speed);
        state.velocity += wish_direction * accel_speed;
    }
}

fn update_yaw(state: &mut MovementState, command: &PlayerCommand) {
    state.yaw += command.yaw_delta;

    // Normalize yaw to -PI..PI
    if !(-PI..=PI).contains(&state.yaw) {
        state.yaw = (state.yaw + PI).rem_euclid(TAU) - PI;
    }
}

fn apply_ground(state: &mut MovementState, ground: &GroundState) {
    state.flags.set(MovementFlags::ON_GROUND, ground.grounded);
    state.ground_entity = ground.entity;
    state.ground_normal = ground.normal;
}

// ============================================================================
// Tests
// ============================================================================
