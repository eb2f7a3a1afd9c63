//! Replicated snapshots and client-side prediction.
//!
//! A client runs the movement controller ahead of the server. Every
//! predicted tick is recorded with the command that produced it. When an
//! authoritative snapshot arrives, acknowledged ticks are dropped and the
//! rest are replayed on top of the server's state.

use std::collections::VecDeque;

use glam::Vec3;
use jetstride_physics::movement::{JumpState, ThrustResource};
use jetstride_physics::{
    BrushId, MovementEvents, MovementFlags, MovementState, PlayerCommand, PlayerController,
    SweepQuery,
};
use serde::{Deserialize, Serialize};

/// Corrections shorter than this are not worth logging.
const CORRECTION_LOG_THRESHOLD: f32 = 1.0e-3;

/// The replicated state of one actor at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Frame whose tick produced this state.
    pub frame: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub flags: MovementFlags,
    pub ground_entity: Option<BrushId>,
    pub ground_normal: Vec3,
    pub thrust: ThrustResource,
    pub jump: JumpState,
}

impl PlayerSnapshot {
    /// Capture a movement state.
    pub fn capture(frame: u64, state: &MovementState) -> Self {
        Self {
            frame,
            position: state.position,
            velocity: state.velocity,
            yaw: state.yaw,
            flags: state.flags,
            ground_entity: state.ground_entity,
            ground_normal: state.ground_normal,
            thrust: state.thrust,
            jump: state.jump,
        }
    }

    /// Rebuild the movement state this snapshot was captured from.
    pub fn restore(&self) -> MovementState {
        MovementState {
            position: self.position,
            velocity: self.velocity,
            yaw: self.yaw,
            flags: self.flags,
            ground_entity: self.ground_entity,
            ground_normal: self.ground_normal,
            thrust: self.thrust,
            jump: self.jump,
        }
    }
}

/// One locally predicted tick.
#[derive(Debug, Clone, Copy)]
struct PredictedTick {
    command: PlayerCommand,
    result: PlayerSnapshot,
}

/// Client-side prediction for a single locally controlled actor.
#[derive(Debug, Clone)]
pub struct Prediction {
    state: MovementState,
    history: VecDeque<PredictedTick>,
    capacity: usize,
}

impl Prediction {
    /// Start predicting from `state`, remembering at most `capacity` ticks.
    pub fn new(state: MovementState, capacity: usize) -> Self {
        Self {
            state,
            history: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Current predicted state.
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    /// Number of ticks not yet acknowledged by the server.
    pub fn pending(&self) -> usize {
        self.history.len()
    }

    /// Predicted result of `frame`, if it is still in the history.
    pub fn predicted(&self, frame: u64) -> Option<&PlayerSnapshot> {
        self.history
            .iter()
            .map(|tick| &tick.result)
            .find(|snapshot| snapshot.frame == frame)
    }

    /// Run the local tick for `frame` and record it.
    pub fn predict<Q>(
        &mut self,
        frame: u64,
        command: PlayerCommand,
        controller: &PlayerController,
        world: &Q,
        delta_time: f32,
    ) -> MovementEvents
    where
        Q: SweepQuery + ?Sized,
    {
        let events = controller.update(&mut self.state, &command, world, delta_time);

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(PredictedTick {
            command,
            result: PlayerSnapshot::capture(frame, &self.state),
        });

        events
    }

    /// Apply an authoritative snapshot and replay unacknowledged ticks.
    ///
    /// Returns how far the current predicted position moved.
    pub fn reconcile<Q>(
        &mut self,
        authoritative: &PlayerSnapshot,
        controller: &PlayerController,
        world: &Q,
        delta_time: f32,
    ) -> Vec3
    where
        Q: SweepQuery + ?Sized,
    {
        while self
            .history
            .front()
            .is_some_and(|tick| tick.result.frame <= authoritative.frame)
        {
            self.history.pop_front();
        }

        let before = self.state.position;
        self.state = authoritative.restore();

        for tick in &mut self.history {
            controller.update(&mut self.state, &tick.command, world, delta_time);
            tick.result = PlayerSnapshot::capture(tick.result.frame, &self.state);
        }

        let correction = self.state.position - before;
        if correction.length() > CORRECTION_LOG_THRESHOLD {
            log::debug!(
                "reconciled frame {}: corrected by {:?}, replayed {}",
                authoritative.frame,
                correction,
                self.history.len()
            );
        }

        correction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetstride_physics::{CollisionWorld, ContentFlags};

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world
            .add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0), ContentFlags::SOLID)
            .unwrap();
        world
    }

    fn spawned(controller: &PlayerController, world: &CollisionWorld) -> MovementState {
        let mut state = controller.new_state(Vec3::ZERO);
        controller.spawn_at(&mut state, Vec3::ZERO, world);
        state
    }

    fn walk() -> PlayerCommand {
        PlayerCommand {
            forward_move: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = MovementState::with_thrust(Vec3::new(3.0, 1.0, -2.0), 50.0);
        state.yaw = 1.25;
        state.ground_entity = Some(4);
        let snapshot = PlayerSnapshot::capture(9, &state);
        assert_eq!(snapshot.restore(), state);
    }

    #[test]
    fn test_history_is_bounded() {
        let world = floor();
        let controller = PlayerController::with_default_config();
        let mut prediction = Prediction::new(controller.new_state(Vec3::ZERO), 4);

        for frame in 1..=10 {
            prediction.predict(frame, walk(), &controller, &world, DT);
        }

        assert_eq!(prediction.pending(), 4);
        assert!(prediction.predicted(6).is_none());
        assert!(prediction.predicted(7).is_some());
    }

    #[test]
    fn test_matching_snapshot_needs_no_correction() {
        let world = floor();
        let controller = PlayerController::with_default_config();
        let mut prediction = Prediction::new(spawned(&controller, &world), 32);

        for frame in 1..=10 {
            prediction.predict(frame, walk(), &controller, &world, DT);
        }
        let predicted = prediction.state().position;
        let server = *prediction.predicted(5).unwrap();

        let correction = prediction.reconcile(&server, &controller, &world, DT);

        assert_eq!(correction, Vec3::ZERO);
        assert_eq!(prediction.pending(), 5);
        assert_eq!(prediction.state().position, predicted);
    }

    #[test]
    fn test_divergent_snapshot_corrects() {
        let world = floor();
        let controller = PlayerController::with_default_config();
        let mut prediction = Prediction::new(spawned(&controller, &world), 32);

        for frame in 1..=10 {
            prediction.predict(frame, walk(), &controller, &world, DT);
        }
        let mut server = *prediction.predicted(5).unwrap();
        server.position.z += 1.0;

        let correction = prediction.reconcile(&server, &controller, &world, DT);

        assert!((correction.z - 1.0).abs() < 1e-3, "correction={correction:?}");
        assert_eq!(prediction.predicted(10).unwrap().position, prediction.state().position);
    }

    #[test]
    fn test_snapshot_past_history_clears_it() {
        let world = floor();
        let controller = PlayerController::with_default_config();
        let mut prediction = Prediction::new(controller.new_state(Vec3::ZERO), 8);

        for frame in 1..=3 {
            prediction.predict(frame, walk(), &controller, &world, DT);
        }
        let server = PlayerSnapshot::capture(3, &controller.new_state(Vec3::new(1.0, 0.0, 0.0)));

        let correction = prediction.reconcile(&server, &controller, &world, DT);

        assert_eq!(prediction.pending(), 0);
        assert_eq!(prediction.state().position, Vec3::new(1.0, 0.0, 0.0));
        assert!(correction.length() > 0.0);
    }
}
