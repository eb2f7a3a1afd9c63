//! Collision world containing all static and kinematic geometry.
//!
//! The collision world stores brushes as parry3d shapes and answers
//! [`SweepQuery`] requests against them.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, RayCast};
use parry3d::shape::SharedShape;
use thiserror::Error;

use super::flags::ContentFlags;
use super::query::{SweepQuery, TraceFilter};
use super::trace::{BrushId, TraceResult, TraceShape};

/// Distance a blocked sweep backs off from the surface it hit.
pub const SKIN_DISTANCE: f32 = 0.002;

/// Penetration depth below which shapes count as touching, not stuck.
const PENETRATION_SLOP: f32 = 0.001;

/// Sweeps shorter than this are overlap tests.
const MIN_SWEEP_DISTANCE: f32 = 1.0e-5;

/// Radius of the tiny ball standing in for a point in overlap tests.
const POINT_RADIUS: f32 = 0.001;

/// Gap refinement steps per brush in a shape sweep.
const MAX_ADVANCE_STEPS: usize = 24;

/// A sweep stops once it is this close to the skin gap.
const ADVANCE_TOLERANCE: f32 = 1.0e-5;

/// Sweeps closing on a brush slower than this share of their length are
/// treated as sliding along it.
const MIN_CLOSING_RATIO: f32 = 1.0e-3;

/// Errors raised while building a collision world.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// Box half extents must be strictly positive.
    #[error("box half extents must be positive, got {0:?}")]
    InvalidExtents(Vec3),

    /// The convex hull of the given points is degenerate.
    #[error("convex hull of {0} points is degenerate")]
    DegenerateHull(usize),
}

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: BrushId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, clip, trigger, etc.).
    pub contents: ContentFlags,
}

/// The collision world containing all geometry.
///
/// Supports axis-aligned boxes, oriented boxes (ramps, slopes) and convex
/// hulls. The world is read-only while movement runs.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: BrushId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        contents: ContentFlags,
    ) -> Result<BrushId, WorldError> {
        self.add_oriented_box(center, half_extents, Vec3::ZERO, contents)
    }

    /// Add a rotated box to the world.
    ///
    /// `rotation` is a scaled axis: its direction is the rotation axis and
    /// its length the angle in radians.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Vec3,
        contents: ContentFlags,
    ) -> Result<BrushId, WorldError> {
        if half_extents.min_element() <= 0.0 {
            return Err(WorldError::InvalidExtents(half_extents));
        }

        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(to_vector(center), to_vector(rotation));

        Ok(self.push_brush(shape, transform, contents))
    }

    /// Add a convex hull to the world.
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        contents: ContentFlags,
    ) -> Result<BrushId, WorldError> {
        let parry_points: Vec<Point<Real>> =
            points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let shape = SharedShape::convex_hull(&parry_points)
            .ok_or(WorldError::DegenerateHull(points.len()))?;

        Ok(self.push_brush(shape, Isometry::identity(), contents))
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: BrushId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|b| b.id == id)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
    ) -> BrushId {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });

        id
    }

    fn filtered(&self, filter: TraceFilter) -> impl Iterator<Item = &CollisionBrush> {
        self.brushes
            .iter()
            .filter(move |b| filter.accepts(b.id, b.contents))
    }

    /// Find the brush the shape penetrates most deeply, beyond the slop.
    fn deepest_penetration(
        &self,
        shape: &SharedShape,
        transform: &Isometry<Real>,
        filter: TraceFilter,
    ) -> Option<Penetration> {
        let mut deepest: Option<Penetration> = None;

        for brush in self.filtered(filter) {
            let Ok(Some(contact)) = query::contact(
                transform,
                shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                0.0,
            ) else {
                continue;
            };

            let depth = -contact.dist;
            if depth <= PENETRATION_SLOP {
                continue;
            }
            if deepest.as_ref().map_or(true, |d| depth > d.depth) {
                // normal2 is the brush's outward normal: the push-out direction.
                let normal = to_vec3(&contact.normal2).normalize_or_zero();
                deepest = Some(Penetration {
                    depth,
                    normal: if normal == Vec3::ZERO { Vec3::Y } else { normal },
                    brush: brush.id,
                });
            }
        }

        deepest
    }

    fn trace_shape(&self, shape: TraceShape, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult {
        let test_shape = parry_shape(shape);
        let start_transform = shape_transform(start, shape);

        if let Some(contact) = self.deepest_penetration(&test_shape, &start_transform, filter) {
            return TraceResult::stuck(start, contact.normal, Some(contact.brush));
        }

        let delta = end - start;
        let distance = delta.length();
        if distance < MIN_SWEEP_DISTANCE {
            return TraceResult::no_hit(start);
        }

        let mut closest: Option<(f32, Vec3, &CollisionBrush)> = None;

        for brush in self.filtered(filter) {
            let Some((toi, normal)) = time_of_impact(&test_shape, shape, start, delta, brush) else {
                continue;
            };

            if closest.map_or(true, |(best, _, _)| toi < best) {
                closest = Some((toi, normal, brush));
            }
        }

        let Some((fraction, normal, brush)) = closest else {
            return TraceResult::no_hit(end);
        };

        TraceResult {
            fraction,
            end_position: start + delta * fraction,
            hit_normal: Some(normal),
            hit_contents: brush.contents,
            started_in_solid: false,
            hit_entity: Some(brush.id),
        }
    }

    fn trace_ray(&self, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();
        if distance < MIN_SWEEP_DISTANCE {
            return if self.overlap(TraceShape::Point, start, filter) {
                TraceResult::stuck(start, Vec3::Y, None)
            } else {
                TraceResult::no_hit(start)
            };
        }

        let direction = delta / distance;
        let ray = Ray::new(
            Point::new(start.x, start.y, start.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        let mut closest: Option<(f32, Vec3, &CollisionBrush)> = None;

        for brush in self.filtered(filter) {
            let Some(hit) =
                RayCast::cast_ray_and_get_normal(brush.shape.as_ref(), &brush.transform, &ray, distance, true)
            else {
                continue;
            };

            if closest.map_or(true, |(toi, _, _)| hit.time_of_impact < toi) {
                closest = Some((hit.time_of_impact, to_vec3(&hit.normal), brush));
            }
        }

        let Some((toi, normal, brush)) = closest else {
            return TraceResult::no_hit(end);
        };

        if toi <= MIN_SWEEP_DISTANCE {
            // Solid rays report a zero time of impact from inside a shape.
            return TraceResult::stuck(start, -direction, Some(brush.id));
        }

        TraceResult {
            fraction: toi / distance,
            end_position: start + direction * toi,
            hit_normal: Some(normal.try_normalize().unwrap_or(-direction)),
            hit_contents: brush.contents,
            started_in_solid: false,
            hit_entity: Some(brush.id),
        }
    }
}

impl SweepQuery for CollisionWorld {
    fn sweep(&self, shape: TraceShape, start: Vec3, end: Vec3, filter: TraceFilter) -> TraceResult {
        if shape.is_point() {
            self.trace_ray(start, end, filter)
        } else {
            self.trace_shape(shape, start, end, filter)
        }
    }

    fn overlap(&self, shape: TraceShape, position: Vec3, filter: TraceFilter) -> bool {
        let test_shape = parry_shape(shape);
        let transform = shape_transform(position, shape);
        self.deepest_penetration(&test_shape, &transform, filter).is_some()
    }
}

struct Penetration {
    depth: f32,
    normal: Vec3,
    brush: BrushId,
}

/// Sweep `shape` along `delta` until its gap to `brush` shrinks to
/// [`SKIN_DISTANCE`]. Returns the fraction reached and the brush's outward
/// normal there, or `None` if the sweep never closes to the skin.
///
/// Brushes are convex, so along a straight sweep the gap is a convex
/// function of time: stepping to where its tangent reaches the skin never
/// overshoots, and a gap that is not closing never closes later. A shape
/// already inside the skin but sliding along or away from the brush is
/// therefore not blocked by it.
fn time_of_impact(
    parry: &SharedShape,
    shape: TraceShape,
    start: Vec3,
    delta: Vec3,
    brush: &CollisionBrush,
) -> Option<(f32, Vec3)> {
    let length = delta.length();
    let prediction = length + SKIN_DISTANCE;
    let mut toi = 0.0;
    let mut last_normal = None;

    for _ in 0..MAX_ADVANCE_STEPS {
        let transform = shape_transform(start + delta * toi, shape);
        let Ok(Some(contact)) = query::contact(
            &transform,
            parry.as_ref(),
            &brush.transform,
            brush.shape.as_ref(),
            prediction,
        ) else {
            return None;
        };

        let normal = to_vec3(&contact.normal2).try_normalize()?;
        let closing = -delta.dot(normal);
        if closing <= MIN_CLOSING_RATIO * length {
            return None;
        }

        let gap = contact.dist - SKIN_DISTANCE;
        if gap <= ADVANCE_TOLERANCE {
            return Some((toi, normal));
        }

        toi += gap / closing;
        if toi > 1.0 {
            return None;
        }
        last_normal = Some(normal);
    }

    // Out of steps: everything up to here is still clear of the skin.
    last_normal.map(|normal| (toi, normal))
}

/// Create a parry3d shape from a trace shape.
fn parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsules are defined by the half-height of the cylinder part.
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, radius)
        }
        TraceShape::Box { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        TraceShape::Point => SharedShape::ball(POINT_RADIUS),
    }
}

/// Transform placing a shape whose bottom-centre is at `position`.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = shape.height() / 2.0;
    Isometry::translation(position.x, position.y + offset_y, position.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
