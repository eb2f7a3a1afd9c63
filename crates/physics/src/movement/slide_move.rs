//! Iterative clip-and-slide resolution.
//!
//! Sweeps the actor along its velocity, clips the velocity against each
//! surface it touches and re-sweeps the remaining time. Stair steps are
//! tried before clipping against near-vertical obstructions.

use glam::Vec3;

use crate::collision::SweepQuery;

use super::clip_normal::{clipping_normal, NormalBias};
use super::context::MoveContext;
use super::step::try_step;

/// Squared move length below which a move counts as resolved.
const MIN_MOVE_SQUARED: f32 = 1.0e-12;

/// Transient state for one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveState {
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Share of the requested movement not yet consumed, in `[0, 1]`.
    pub fraction_remaining: f32,
    /// Whether a stair step was taken.
    pub stepped: bool,
}

impl MoveState {
    /// Start a resolution from a position and velocity.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            fraction_remaining: 1.0,
            stepped: false,
        }
    }
}

/// Clip velocity against a surface normal.
///
/// Removes the component of velocity along the normal. A positive
/// `overclip` leaves that much speed pointing away from the surface.
#[inline]
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overclip: f32) -> Vec3 {
    velocity - normal * (velocity.dot(normal) - overclip)
}

/// Resolve `state.velocity * delta_time` against the world.
///
/// Each round sweeps the remaining movement, advances to the contact and
/// clips the velocity. Two opposing contacts in a row slide the velocity
/// along their crease instead of bouncing between the planes. When
/// `can_step` is set, near-vertical obstructions are tried as stair steps
/// first.
///
/// Returns the share of the requested movement completed: `1.0` when
/// unobstructed, `0.0` when blocked at the start.
pub fn resolve<Q>(
    ctx: &MoveContext<'_, Q>,
    state: &mut MoveState,
    delta_time: f32,
    can_step: bool,
    max_iterations: usize,
) -> f32
where
    Q: SweepQuery + ?Sized,
{
    let overclip = ctx.config.overclip;
    let mut previous_normal: Option<Vec3> = None;

    for _ in 0..max_iterations {
        let delta = state.velocity * delta_time * state.fraction_remaining;
        if delta.length_squared() < MIN_MOVE_SQUARED {
            break;
        }

        let trace = ctx.sweep(state.position, state.position + delta);
        if trace.started_in_solid {
            log::trace!("slide blocked: started in solid at {:?}", state.position);
            break;
        }

        state.position = trace.end_position;
        if !trace.hit_something() {
            state.fraction_remaining = 0.0;
            break;
        }
        state.fraction_remaining *= 1.0 - trace.fraction;

        let raw = trace.normal_or_up();

        if can_step && Vec3::new(delta.x, 0.0, delta.z).length_squared() > MIN_MOVE_SQUARED {
            let wall = clipping_normal(ctx, &trace, NormalBias::Wall);
            if wall.y < ctx.config.min_step_normal && try_step(ctx, state, wall, delta_time) {
                continue;
            }
        }

        state.velocity = match previous_normal {
            Some(previous) if previous.dot(raw) < 0.0 => {
                let crease = previous.cross(raw).normalize_or_zero();
                crease * state.velocity.dot(crease)
            }
            _ => {
                let normal = clipping_normal(ctx, &trace, NormalBias::Center);
                let clipped = clip_velocity(state.velocity, normal, overclip);
                if clipped.dot(raw) < 0.0 {
                    clip_velocity(clipped, raw, overclip)
                } else {
                    clipped
                }
            }
        };

        previous_normal = Some(raw);
    }

    1.0 - state.fraction_remaining
}
