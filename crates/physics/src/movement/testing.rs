//! Analytic geometry for solver tests.

use glam::Vec3;

use crate::collision::{
    BrushId, ContentFlags, SweepQuery, TraceFilter, TraceResult, TraceShape, SKIN_DISTANCE,
};

/// Depth below which a shape counts as touching rather than stuck.
const PENETRATION_SLOP: f32 = 0.001;

/// A solid half-space: everything behind a plane.
#[derive(Debug, Clone, Copy)]
struct HalfSpace {
    normal: Vec3,
    offset: f32,
    id: BrushId,
}

/// World made of infinite half-spaces.
///
/// Each plane is `normal · p = offset` with solid behind the normal.
/// Sweeps are exact, so solver tests can assert precise fractions.
#[derive(Debug, Default)]
pub struct PlaneWorld {
    planes: Vec<HalfSpace>,
}

impl PlaneWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plane. Plane ids count up from zero.
    pub fn with_plane(mut self, normal: Vec3, offset: f32) -> Self {
        let id = self.planes.len() as BrushId;
        self.planes.push(HalfSpace {
            normal: normal.normalize(),
            offset,
            id,
        });
        self
    }

    /// Smallest signed distance from `shape` to any plane.
    pub fn clearance(&self, shape: TraceShape, position: Vec3) -> f32 {
        self.planes
            .iter()
            .map(|p| support(shape, position, p.normal) - p.offset)
            .fold(f32::INFINITY, f32::min)
    }

    fn accepted(&self, filter: TraceFilter) -> impl Iterator<Item = &HalfSpace> {
        self.planes
            .iter()
            .filter(move |p| filter.accepts(p.id, ContentFlags::SOLID))
    }
}

/// Lowest value of `normal · x` over the shape placed at `position`.
fn support(shape: TraceShape, position: Vec3, normal: Vec3) -> f32 {
    match shape {
        TraceShape::Capsule { .. } => {
            let lower = normal.dot(position + shape.lower_cap_offset());
            let upper = normal.dot(position + shape.upper_cap_offset());
            lower.min(upper) - shape.radius()
        }
        TraceShape::Box { half_extents } => {
            let center = position + Vec3::Y * half_extents.y;
            normal.dot(center) - normal.abs().dot(half_extents)
        }
        TraceShape::Point => normal.dot(position),
    }
}

impl SweepQuery for PlaneWorld {
    fn sweep(&self, shape: TraceShape, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();
        let mut closest: Option<(f32, &HalfSpace)> = None;

        for plane in self.accepted(filter) {
            let clearance = support(shape, start, plane.normal) - plane.offset;
            let limit = if shape.is_point() { 0.0 } else { -PENETRATION_SLOP };
            if clearance < limit {
                return TraceResult::stuck(start, plane.normal, Some(plane.id));
            }

            let approach = plane.normal.dot(delta);
            if approach >= 0.0 {
                continue;
            }
            let toi = (clearance / -approach).max(0.0);
            if toi <= 1.0 && closest.map_or(true, |(t, _)| toi < t) {
                closest = Some((toi, plane));
            }
        }

        let Some((toi, plane)) = closest else {
            return TraceResult::no_hit(end);
        };

        let fraction = if shape.is_point() {
            toi
        } else {
            ((toi * distance - SKIN_DISTANCE) / distance).clamp(0.0, toi)
        };
        TraceResult::hit(fraction, start + delta * fraction, plane.normal, plane.id)
    }

    fn overlap(&self, shape: TraceShape, position: Vec3, filter: TraceFilter) -> bool {
        self.accepted(filter)
            .any(|p| support(shape, position, p.normal) - p.offset < -PENETRATION_SLOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_lands_on_plane() {
        let world = PlaneWorld::new().with_plane(Vec3::Y, 0.0);

        let result = world.sweep(
            TraceShape::ACTOR,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            TraceFilter::ACTOR,
        );

        assert!((result.fraction - 0.499).abs() < 1e-5);
        assert!((result.end_position.y - SKIN_DISTANCE).abs() < 1e-5);
        assert_eq!(result.hit_entity, Some(0));
    }

    #[test]
    fn test_overlap_and_filter() {
        let world = PlaneWorld::new().with_plane(Vec3::Y, 0.0);

        assert!(world.overlap(TraceShape::ACTOR, Vec3::new(0.0, -0.1, 0.0), TraceFilter::ACTOR));
        assert!(!world.overlap(
            TraceShape::ACTOR,
            Vec3::new(0.0, -0.1, 0.0),
            TraceFilter::ACTOR.ignoring(0)
        ));
    }
}
