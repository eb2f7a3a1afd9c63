//! Content flags for collision filtering.
//!
//! Every brush in the world carries a content set. Traces carry a mask and
//! only collide with brushes whose contents intersect it.

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume a brush is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, stairs.
    pub const SOLID: Self = Self(1 << 0);

    /// Player clip - blocks actors but not rays fired by presentation code.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Kinematic geometry (lifts, doors). Collides like solid but may be
    /// referenced as a ground entity.
    pub const KINEMATIC: Self = Self(1 << 2);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Standard mask for actor movement traces.
    pub const MASK_ACTOR_SOLID: Self =
        Self(Self::SOLID.0 | Self::PLAYER_CLIP.0 | Self::KINEMATIC.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
