//! Sweep shapes and the results a [`SweepQuery`](super::SweepQuery) returns.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Identifier of a brush in a collision world.
///
/// Also used as the actor's "ground entity" reference.
pub type BrushId = u32;

/// First contact found by a sweep.
///
/// Plain value: produced by a query and consumed within the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// Share of the requested sweep covered before contact, `0.0..=1.0`.
    /// `1.0` means the path was clear.
    pub fraction: f32,

    /// Where the shape ended up, backed off from any contact by the skin
    /// distance.
    pub end_position: Vec3,

    /// Outward surface normal at the impact point. `None` if nothing was hit.
    pub hit_normal: Option<Vec3>,

    /// Contents of the brush that was hit.
    pub hit_contents: ContentFlags,

    /// The shape overlapped geometry before moving. Movement treats this
    /// as a fully blocked move.
    pub started_in_solid: bool,

    /// Brush that was hit, if any.
    pub hit_entity: Option<BrushId>,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// A clear sweep ending at `end_position`.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            hit_entity: None,
        }
    }

    /// A contact at `fraction` against brush `entity`.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3, entity: BrushId) -> Self {
        Self {
            fraction,
            end_position,
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            started_in_solid: false,
            hit_entity: Some(entity),
        }
    }

    /// Create a trace result for a trace that began inside geometry.
    ///
    /// The shape does not move; `normal` is the best push-out direction the
    /// backend could find.
    pub fn stuck(start: Vec3, normal: Vec3, entity: Option<BrushId>) -> Self {
        Self {
            fraction: 0.0,
            end_position: start,
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            started_in_solid: true,
            hit_entity: entity,
        }
    }

    /// Whether anything blocked the sweep.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0 || self.started_in_solid
    }

    /// Contact normal, or up for a clear sweep.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape swept by a query.
///
/// Shapes are positioned by their bottom-centre: a capsule at `p` spans
/// `p.y ..= p.y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (cylinder with hemisphere caps).
    Capsule {
        /// Radius of the body and both caps.
        radius: f32,
        /// Overall height, caps included.
        height: f32,
    },

    /// An axis-aligned box.
    Box {
        /// Half-size along each axis.
        half_extents: Vec3,
    },

    /// A single point. Sweeping a point is a ray cast.
    Point,
}

impl TraceShape {
    /// Default actor capsule.
    pub const ACTOR: Self = Self::Capsule {
        radius: 0.4,
        height: 1.8,
    };

    /// Horizontal radius used for probe offsets.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } => *radius,
            Self::Box { half_extents } => half_extents.x.max(half_extents.z),
            Self::Point => 0.0,
        }
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Box { half_extents } => half_extents.y * 2.0,
            Self::Point => 0.0,
        }
    }

    /// Centre of the lower end-cap sphere, relative to the shape origin.
    pub fn lower_cap_offset(&self) -> Vec3 {
        Vec3::Y * self.radius().min(self.height() * 0.5)
    }

    /// Centre of the upper end-cap sphere, relative to the shape origin.
    pub fn upper_cap_offset(&self) -> Vec3 {
        Vec3::Y * (self.height() - self.radius()).max(self.height() * 0.5)
    }

    /// Sweeping a point is a ray cast.
    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point)
    }
}

impl Default for TraceShape {
    fn default() -> Self {
        Self::ACTOR
    }
}
