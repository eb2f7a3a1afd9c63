//! Level construction.

use glam::Vec3;
use jetstride_physics::{BrushId, CollisionWorld, ContentFlags, WorldError};
use serde::{Deserialize, Serialize};

/// A game level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A spawn point for players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Add an axis-aligned solid block.
    pub fn add_block(&mut self, center: Vec3, half_extents: Vec3) -> Result<BrushId, WorldError> {
        self.collision.add_box(center, half_extents, ContentFlags::SOLID)
    }

    /// Create a movement test level.
    ///
    /// Each feature sits in its own lane along +X:
    ///
    /// ```text
    ///  z =  25   raised ledge (1 m, too tall to step)
    ///  z =  10   staircase (5 x 0.2 m risers) onto a platform
    ///  z =   0   open floor, spawns at x = -20 and x = 20
    ///  z = -10   walkable 20° ramp
    ///  z = -25   unwalkable 60° slope
    /// ```
    pub fn test_arena() -> Result<Self, WorldError> {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.add_block(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0))?;

        // Perimeter walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 50.0;
        for (center, half_extents) in [
            (
                Vec3::new(0.0, wall_height / 2.0, -arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(0.0, wall_height / 2.0, arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
            (
                Vec3::new(-arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
        ] {
            level.add_block(center, half_extents)?;
        }

        // Free-standing wall across the spawn lane
        level.add_block(Vec3::new(30.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 4.0))?;

        // Staircase: every step runs to the far end of the platform.
        let stair_rise = 0.2;
        let stair_run = 0.5;
        let stair_end = 20.0;
        for i in 0..5 {
            let start = stair_run * i as f32;
            let top = stair_rise * (i + 1) as f32;
            level.add_block(
                Vec3::new((start + stair_end) / 2.0, top / 2.0, 10.0),
                Vec3::new((stair_end - start) / 2.0, top / 2.0, 2.0),
            )?;
        }

        // Ramp and slope, tilted about Z so they rise toward +X.
        level.collision.add_oriented_box(
            Vec3::new(6.0, 0.0, -10.0),
            Vec3::new(6.0, 0.5, 2.0),
            Vec3::Z * 20.0_f32.to_radians(),
            ContentFlags::SOLID,
        )?;
        level.collision.add_oriented_box(
            Vec3::new(6.0, 0.0, -25.0),
            Vec3::new(4.0, 0.5, 2.0),
            Vec3::Z * 60.0_f32.to_radians(),
            ContentFlags::SOLID,
        )?;

        // Raised ledge
        level.add_block(Vec3::new(6.0, 0.5, 25.0), Vec3::new(4.0, 0.5, 2.0))?;

        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, 0.0),
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 0.0, 0.0),
            facing: std::f32::consts::PI,
        });

        Ok(level)
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
