//! The query interface the movement code is written against.
//!
//! Movement never talks to a geometry library directly. It asks a
//! [`SweepQuery`] to sweep a shape or test an overlap, which keeps the
//! solver testable against synthetic worlds.

use glam::Vec3;

use super::flags::ContentFlags;
use super::trace::{BrushId, TraceResult, TraceShape};

/// Filter applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFilter {
    /// Only brushes whose contents intersect this mask are considered.
    pub mask: ContentFlags,
    /// Brush to skip, typically the actor's own body.
    pub ignore: Option<BrushId>,
}

impl TraceFilter {
    /// Filter used for actor movement traces.
    pub const ACTOR: Self = Self {
        mask: ContentFlags::MASK_ACTOR_SOLID,
        ignore: None,
    };

    /// Create a filter with the given mask.
    pub fn new(mask: ContentFlags) -> Self {
        Self { mask, ignore: None }
    }

    /// Skip a specific brush.
    pub fn ignoring(self, id: BrushId) -> Self {
        Self {
            ignore: Some(id),
            ..self
        }
    }

    /// Check whether a brush passes this filter.
    #[inline]
    pub fn accepts(&self, id: BrushId, contents: ContentFlags) -> bool {
        self.mask.intersects(contents) && self.ignore != Some(id)
    }
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self::ACTOR
    }
}

/// Shape-sweep capability consumed by the movement core.
///
/// Implementations must be deterministic: identical arguments against
/// identical geometry yield identical results.
pub trait SweepQuery {
    /// Sweep `shape` from `start` to `end` and report the first contact.
    ///
    /// A zero-length sweep is an overlap test at `start`. Sweeping a
    /// [`TraceShape::Point`] is a ray cast.
    fn sweep(&self, shape: TraceShape, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult;

    /// Check whether `shape` placed at `position` overlaps any geometry.
    fn overlap(&self, shape: TraceShape, position: Vec3, filter: TraceFilter) -> bool;

    /// Cast a ray from `origin` along `direction` up to `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: TraceFilter,
    ) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }
        self.sweep(TraceShape::Point, origin, origin + dir * max_distance, filter)
    }
}

impl<T: SweepQuery + ?Sized> SweepQuery for &T {
    fn sweep(&self, shape: TraceShape, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult {
        (**self).sweep(shape, start, end, filter)
    }

    fn overlap(&self, shape: TraceShape, position: Vec3, filter: TraceFilter) -> bool {
        (**self).overlap(shape, position, filter)
    }
}
