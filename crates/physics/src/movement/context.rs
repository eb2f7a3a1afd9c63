//! Shared inputs for one movement resolution.

use glam::Vec3;

use crate::collision::{SweepQuery, TraceFilter, TraceResult, TraceShape};

use super::config::MovementConfig;

/// Everything a movement routine needs besides the mutable move state:
/// the geometry to query, the actor's shape and filter, and the tuning.
///
/// Holds no mutable state, so it can be shared by the solver, the step
/// resolver and ground adherence within one tick.
pub struct MoveContext<'a, Q: SweepQuery + ?Sized> {
    /// Geometry backend.
    pub world: &'a Q,
    /// Actor collision shape.
    pub shape: TraceShape,
    /// Filter applied to every query.
    pub filter: TraceFilter,
    /// Movement tuning.
    pub config: &'a MovementConfig,
}

impl<'a, Q: SweepQuery + ?Sized> MoveContext<'a, Q> {
    /// Create a context for the actor described by `config`.
    pub fn new(world: &'a Q, config: &'a MovementConfig) -> Self {
        Self {
            world,
            shape: config.shape(),
            filter: TraceFilter::ACTOR,
            config,
        }
    }

    /// Sweep the actor shape.
    #[inline]
    pub fn sweep(&self, start: Vec3, end: Vec3) -> TraceResult {
        self.world.sweep(self.shape, start, end, self.filter)
    }

    /// Trace a ray.
    #[inline]
    pub fn ray(&self, start: Vec3, end: Vec3) -> TraceResult {
        self.world.sweep(TraceShape::Point, start, end, self.filter)
    }

    /// Check whether the actor shape at `position` is inside geometry.
    #[inline]
    pub fn overlaps(&self, position: Vec3) -> bool {
        self.world.overlap(self.shape, position, self.filter)
    }
}
