//! Clipping-normal correction.
//!
//! A capsule touching a sharp edge reports a normal that points from the
//! edge to the cap centre: halfway between the two faces that meet there.
//! Sliding against that normal makes the actor hop over stair edges and
//! lose traction when standing on them. The corrector asks the world which
//! face the capsule is really against by tracing a short ray from the cap
//! centre past the contact point.

use glam::Vec3;

use crate::collision::{SweepQuery, TraceResult};

use super::context::MoveContext;

/// Horizontal normal length below which a normal counts as straight up
/// or down.
const MIN_HORIZONTAL: f32 = 1.0e-3;

/// How far the wall probe aims past the contact into the obstruction.
const WALL_PROBE_INSET: f32 = 0.005;

/// Which face the probe ray favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBias {
    /// Aim over the edge toward the surface under the capsule centre.
    /// Used for sliding and grounding.
    Center,
    /// Aim under the edge into the obstruction. Used for step detection.
    Wall,
}

/// Derive the normal to clip against from a sweep result.
///
/// Returns the raw normal unchanged when it is unwalkable, has no
/// horizontal part, or the probe cannot confirm the same surface.
/// Otherwise keeps the raw horizontal direction and takes the vertical
/// component from the probed face.
pub fn clipping_normal<Q>(ctx: &MoveContext<'_, Q>, trace: &TraceResult, bias: NormalBias) -> Vec3
where
    Q: SweepQuery + ?Sized,
{
    let raw = trace.normal_or_up();
    if trace.started_in_solid || raw.y < ctx.config.min_ground_normal {
        return raw;
    }

    let horizontal = Vec3::new(raw.x, 0.0, raw.z);
    let horizontal_length = horizontal.length();
    if horizontal_length < MIN_HORIZONTAL {
        return raw;
    }
    let away = horizontal / horizontal_length;
    let into = -away;

    let cap_offset = if raw.y >= 0.0 {
        ctx.shape.lower_cap_offset()
    } else {
        ctx.shape.upper_cap_offset()
    };
    let cap_center = trace.end_position + cap_offset;
    let contact = cap_center - raw * ctx.shape.radius();

    let bias_distance = ctx.config.normal_probe_bias;
    let target = match bias {
        NormalBias::Center => contact + into * bias_distance,
        NormalBias::Wall => contact - Vec3::Y * bias_distance + into * WALL_PROBE_INSET,
    };

    let to_target = target - cap_center;
    let distance = to_target.length();
    if distance < MIN_HORIZONTAL {
        return raw;
    }
    let probe_end = cap_center + to_target * ((distance + ctx.config.normal_probe_margin) / distance);

    let probe = ctx.ray(cap_center, probe_end);
    if !probe.hit_something() || probe.started_in_solid || probe.hit_entity != trace.hit_entity {
        return raw;
    }

    let probed = probe.normal_or_up();
    if Vec3::new(probed.x, 0.0, probed.z).dot(away) < 0.0 {
        return raw;
    }

    let vertical = probed.y.clamp(-1.0, 1.0);
    away * (1.0 - vertical * vertical).sqrt() + Vec3::Y * vertical
}
