//! Demo level layout.

use glam::DVec3;
use laserutils_core::{BlockId, BlockPos, Voxel};
use laserutils_entity::{Collider, Entity, EntityKind};
use laserutils_world::SandboxLevel;

/// Eye height of the shooter above the floor.
const EYE_HEIGHT: f64 = 1.62;

/// Shortest and longest floor, in blocks past the shooter.
const MIN_FLOOR: i32 = 16;
const MAX_FLOOR: i32 = 256;

/// A floor with walls and zombies placed along +X.
pub struct Scene {
    pub level: SandboxLevel,
    pub eye: DVec3,
    pub targets: Vec<Entity>,
}

impl Scene {
    pub fn build(walls: &[i32], targets: &[f64]) -> Self {
        let mut level = SandboxLevel::new();

        let length = walls
            .iter()
            .map(|&x| x.saturating_add(1))
            .chain(targets.iter().map(|&x| (x.ceil() as i32).saturating_add(1)))
            .max()
            .unwrap_or(0)
            .clamp(MIN_FLOOR, MAX_FLOOR);
        level.fill(
            BlockPos::new(-1, -1, -2),
            BlockPos::new(length, -1, 2),
            Voxel::new(BlockId::GRASS),
        );

        for &x in walls {
            level.fill(
                BlockPos::new(x, 0, -1),
                BlockPos::new(x, 2, 1),
                Voxel::new(BlockId::STONE),
            );
        }

        let targets = targets
            .iter()
            .map(|&x| {
                level.spawn(
                    EntityKind::Zombie,
                    DVec3::new(x, 0.9, 0.5),
                    Collider {
                        half_extents: DVec3::new(0.3, 0.9, 0.3),
                    },
                )
            })
            .collect();

        Self {
            level,
            eye: DVec3::new(0.5, EYE_HEIGHT, 0.5),
            targets,
        }
    }
}
