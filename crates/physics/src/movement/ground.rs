//! Ground detection and adherence.

use glam::Vec3;

use crate::collision::{BrushId, SweepQuery, TraceResult};

use super::clip_normal::{clipping_normal, NormalBias};
use super::config::MovementConfig;
use super::context::MoveContext;

/// Squared difference between raw and clipping normals that marks an edge.
const EDGE_NORMAL_EPSILON: f32 = 1.0e-6;

/// Result of the per-tick ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundState {
    /// The downward probe this state was derived from.
    pub trace: Option<TraceResult>,
    /// Whether the actor counts as standing on ground.
    pub grounded: bool,
    /// Clipping normal of the ground, up while airborne.
    pub normal: Vec3,
    /// Brush underfoot while grounded.
    pub entity: Option<BrushId>,
}

impl Default for GroundState {
    fn default() -> Self {
        Self::airborne()
    }
}

impl GroundState {
    /// Not standing on anything.
    pub fn airborne() -> Self {
        Self {
            trace: None,
            grounded: false,
            normal: Vec3::Y,
            entity: None,
        }
    }

    /// Check whether `velocity` still keeps the actor on this ground.
    pub fn holds(&self, velocity: Vec3, thrusting: bool, config: &MovementConfig) -> bool {
        self.grounded && velocity.dot(self.normal) < separation_threshold(thrusting, config)
    }

    /// Drop grounding, keeping the probe for inspection.
    pub fn leave(&mut self) {
        self.grounded = false;
        self.normal = Vec3::Y;
        self.entity = None;
    }
}

/// Separation speed above which the actor leaves the ground.
#[inline]
fn separation_threshold(thrusting: bool, config: &MovementConfig) -> f32 {
    if thrusting {
        config.thrust_separation_speed
    } else {
        config.ground_separation_speed
    }
}

/// Probe for ground below `position`.
///
/// Grounded when a short downward sweep hits without starting in solid,
/// the clipping normal is walkable and `velocity` does not separate from
/// it faster than the current threshold. Reads nothing but its
/// arguments, so probing twice gives the same answer.
pub fn update_ground<Q>(ctx: &MoveContext<'_, Q>, position: Vec3, velocity: Vec3, thrusting: bool) -> GroundState
where
    Q: SweepQuery + ?Sized,
{
    let config = ctx.config;
    let trace = ctx.sweep(position, position - Vec3::Y * config.ground_probe_distance);

    let mut ground = GroundState {
        trace: Some(trace),
        ..GroundState::airborne()
    };

    if !trace.hit_something() || trace.started_in_solid {
        return ground;
    }

    let normal = clipping_normal(ctx, &trace, NormalBias::Center);
    if normal.y < config.min_ground_normal {
        return ground;
    }

    ground.grounded = true;
    ground.normal = normal;
    ground.entity = trace.hit_entity;

    if !ground.holds(velocity, thrusting, config) {
        ground.leave();
    }

    ground
}

/// Snap a grounded actor back down onto the floor it is walking on.
///
/// Probes up a little, then down by the step height. Snaps when that
/// lands on walkable ground. Landing on an edge, where the raw normal
/// leans away from the face the clipping normal found, additionally needs
/// ground straight below the actor within step range, so actors walk off
/// ledges instead of clinging to them. Returns `position` unchanged
/// otherwise.
pub fn stay_on_ground<Q>(ctx: &MoveContext<'_, Q>, position: Vec3) -> Vec3
where
    Q: SweepQuery + ?Sized,
{
    let config = ctx.config;

    let up = ctx.sweep(position, position + Vec3::Y * config.ground_snap_lift);
    if up.started_in_solid {
        return position;
    }
    let raised = up.end_position;

    let drop = (raised.y - position.y) + config.step_height;
    let down = ctx.sweep(raised, raised - Vec3::Y * drop);
    if !down.hit_something() || down.started_in_solid {
        return position;
    }

    let normal = clipping_normal(ctx, &down, NormalBias::Center);
    if normal.y < config.min_ground_normal {
        return position;
    }

    // Resting on an edge: the raw normal leans off the face below it.
    if (normal - down.normal_or_up()).length_squared() > EDGE_NORMAL_EPSILON {
        let reach = config.ground_snap_lift + config.step_height + config.ground_probe_distance;
        let origin = position + Vec3::Y * config.ground_snap_lift;
        let below = ctx.ray(origin, origin - Vec3::Y * reach);
        if !below.hit_something() || below.started_in_solid {
            return position;
        }
    }

    down.end_position
}
