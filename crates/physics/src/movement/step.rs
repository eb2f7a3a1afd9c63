//! Stair stepping.
//!
//! A capsule sliding into a stair riser stops against its edge before its
//! body clears it. When the slide hits a near-vertical obstruction, the
//! step resolver looks for a walkable tread just past it, lifts the actor
//! by the tread height, moves it forward and sets it back down.

use glam::Vec3;

use crate::collision::SweepQuery;

use super::context::MoveContext;
use super::slide_move::{resolve, MoveState};

/// Extra height the step probe starts above the maximum step, and the
/// clearance kept over the tread while moving forward.
const STEP_CLEARANCE: f32 = 0.01;

/// Margin added to the final downward sweep.
const STEP_DOWN_MARGIN: f32 = 0.02;

/// Rise below which a step counts as no step at all.
const MIN_STEP_RISE: f32 = 1.0e-4;

/// Net gain below which a completed step is rejected.
const MIN_STEP_GAIN: f32 = 1.0e-3;

/// Try to climb the obstruction with normal `wall_normal`.
///
/// On success the stepped position replaces `state.position`, the
/// velocity is kept and `state.stepped` is set. On failure `state` is
/// left exactly as it was.
pub fn try_step<Q>(ctx: &MoveContext<'_, Q>, state: &mut MoveState, wall_normal: Vec3, delta_time: f32) -> bool
where
    Q: SweepQuery + ?Sized,
{
    let config = ctx.config;

    let into = -Vec3::new(wall_normal.x, 0.0, wall_normal.z).normalize_or_zero();
    if into == Vec3::ZERO {
        return false;
    }

    // Look for a tread just past the obstruction, within step range.
    let probe_height = config.step_height + STEP_CLEARANCE;
    let probe_start = state.position
        + into * (ctx.shape.radius() + config.step_probe_depth)
        + Vec3::Y * probe_height;
    let probe = ctx.ray(probe_start, probe_start - Vec3::Y * probe_height);

    if !probe.hit_something() || probe.started_in_solid {
        return false;
    }
    let tread = probe.normal_or_up();
    if tread.y < config.min_ground_normal || tread.y < config.min_step_normal {
        return false;
    }

    let rise = probe.end_position.y - state.position.y;
    if rise <= MIN_STEP_RISE || rise > config.step_height {
        return false;
    }

    let mut stepped = *state;
    stepped.velocity.y = 0.0;

    let lift = rise + STEP_CLEARANCE;
    let up = ctx.sweep(stepped.position, stepped.position + Vec3::Y * lift);
    if up.hit_something() {
        return false;
    }
    stepped.position = up.end_position;

    resolve(ctx, &mut stepped, delta_time, false, 1);

    let down = ctx.sweep(
        stepped.position,
        stepped.position - Vec3::Y * (lift + STEP_DOWN_MARGIN),
    );
    if !down.hit_something() || down.started_in_solid {
        return false;
    }

    if down.end_position.y - state.position.y <= MIN_STEP_GAIN {
        return false;
    }

    log::trace!(
        "stepped {:.3} from {:?} to {:?}",
        down.end_position.y - state.position.y,
        state.position,
        down.end_position
    );

    stepped.position = down.end_position;
    stepped.velocity = state.velocity;
    stepped.stepped = true;
    *state = stepped;

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ContentFlags};
    use crate::movement::config::MovementConfig;

    /// Floor at y=0 and a block whose riser faces -X at x=1.
    fn block_world(height: f32) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world
            .add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), ContentFlags::SOLID)
            .unwrap();
        world
            .add_box(
                Vec3::new(3.0, height / 2.0, 0.0),
                Vec3::new(2.0, height / 2.0, 5.0),
                ContentFlags::SOLID,
            )
            .unwrap();
        world
    }

    /// Move state pressed against the riser, lower cap below the block top.
    fn against_riser() -> MoveState {
        MoveState {
            position: Vec3::new(0.598, 0.002, 0.0),
            velocity: Vec3::new(7.0, 0.0, 0.0),
            fraction_remaining: 0.8,
            stepped: false,
        }
    }

    #[test]
    fn test_step_up_low_block() {
        let world = block_world(0.3);
        let config = MovementConfig::default();
        let ctx = MoveContext::new(&world, &config);

        let mut state = against_riser();
        assert!(try_step(&ctx, &mut state, Vec3::NEG_X, 0.1));

        assert!(state.stepped);
        assert!(state.position.y > 0.1, "y={}", state.position.y);
        assert!(state.position.x > 0.598);
        assert_eq!(state.velocity, Vec3::new(7.0, 0.0, 0.0));
        assert!(state.fraction_remaining < 0.8);
    }

    #[test]
    fn test_tall_block_leaves_state_untouched() {
        let world = block_world(0.6);
        let config = MovementConfig::default();
        let ctx = MoveContext::new(&world, &config);

        let before = against_riser();
        let mut state = before;
        assert!(!try_step(&ctx, &mut state, Vec3::NEG_X, 0.1));
        assert_eq!(state, before);
    }

    #[test]
    fn test_low_ceiling_blocks_step() {
        let mut world = block_world(0.3);
        world
            .add_box(Vec3::new(0.0, 2.2, 0.0), Vec3::new(5.0, 0.2, 5.0), ContentFlags::SOLID)
            .unwrap();
        let config = MovementConfig::default();
        let ctx = MoveContext::new(&world, &config);

        let before = against_riser();
        let mut state = before;
        assert!(!try_step(&ctx, &mut state, Vec3::NEG_X, 0.1));
        assert_eq!(state, before);
    }

    #[test]
    fn test_floor_normal_is_not_a_step() {
        let world = block_world(0.3);
        let config = MovementConfig::default();
        let ctx = MoveContext::new(&world, &config);

        let before = against_riser();
        let mut state = before;
        assert!(!try_step(&ctx, &mut state, Vec3::Y, 0.1));
        assert_eq!(state, before);
    }
}
