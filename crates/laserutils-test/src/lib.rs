//! Test fixtures for LaserUtils.
//!
//! Provides prebuilt levels and helpers shared by the integration tests
//! under `tests/`.

use std::fmt::Debug;

use glam::DVec3;
use laserutils_core::{BlockId, BlockPos, Voxel};
use laserutils_entity::{Collider, Entity, EntityKind};
use laserutils_world::SandboxLevel;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Ray cast error: {0}")]
    RayCast(#[from] laserutils_core::Error),
    #[error("Duplicate hit at index {index}: {entry}")]
    DuplicateHit { index: usize, entry: String },
    #[error("Expected {expected} samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TestError>;

/// Layout of a straight test corridor along +X.
///
/// The ray lane is the row of blocks at y = 0, z = 0.
#[derive(Debug, Clone)]
pub struct CorridorConfig {
    /// X coordinates of solid blocks placed in the lane.
    pub walls: Vec<i32>,
    /// Block placed for each wall.
    pub wall_block: BlockId,
    /// Centers of targets placed in the lane, with their kinds.
    pub targets: Vec<(f64, EntityKind)>,
    /// Edge length of every target's cube collider.
    pub target_size: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            wall_block: BlockId::STONE,
            targets: Vec::new(),
            target_size: 1.0,
        }
    }
}

impl CorridorConfig {
    #[must_use]
    pub fn wall_at(mut self, x: i32) -> Self {
        self.walls.push(x);
        self
    }

    #[must_use]
    pub fn target_at(mut self, x: f64, kind: EntityKind) -> Self {
        self.targets.push((x, kind));
        self
    }
}

/// A built corridor and the entities spawned in it, in config order.
pub struct Corridor {
    pub level: SandboxLevel,
    pub targets: Vec<Entity>,
}

impl Corridor {
    /// Build a corridor from `config`.
    #[must_use]
    pub fn build(config: &CorridorConfig) -> Self {
        let mut level = SandboxLevel::new();
        for &x in &config.walls {
            level.set_voxel(BlockPos::new(x, 0, 0), Voxel::new(config.wall_block));
        }
        let targets = config
            .targets
            .iter()
            .map(|&(x, kind)| {
                level.spawn(
                    kind,
                    lane_point(x),
                    Collider::cube(config.target_size),
                )
            })
            .collect();
        tracing::debug!(
            walls = config.walls.len(),
            targets = config.targets.len(),
            "Built test corridor"
        );
        Self { level, targets }
    }

    /// An empty corridor.
    #[must_use]
    pub fn empty() -> Self {
        Self::build(&CorridorConfig::default())
    }
}

/// Point on the lane's axis at `x`.
#[must_use]
pub const fn lane_point(x: f64) -> DVec3 {
    DVec3::new(x, 0.0, 0.0)
}

/// Relative distance from a whole number below which `distance / increment`
/// is too close to call.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Number of samples a trace of `distance` takes at `increment` when
/// nothing stops it: `ceil(distance / increment)`.
///
/// Returns `None` when the ratio sits within rounding error of a whole
/// number, where the last sample may land on either side of `distance`.
#[must_use]
pub fn expected_samples(distance: f64, increment: f64) -> Option<usize> {
    if distance <= 0.0 {
        return Some(0);
    }
    let ratio = distance / increment;
    if (ratio - ratio.round()).abs() <= ratio.max(1.0) * RATIO_TOLERANCE {
        return None;
    }
    Some(ratio.ceil() as usize)
}

/// Check that `actual` matches [`expected_samples`]. Ratios too close to
/// a whole number pass unchecked.
pub fn check_sample_count(actual: usize, distance: f64, increment: f64) -> Result<()> {
    match expected_samples(distance, increment) {
        Some(expected) if expected != actual => {
            Err(TestError::SampleCount { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Check that no entry of `hits` appears twice.
pub fn check_distinct<T: PartialEq + Debug>(hits: &[T]) -> Result<()> {
    for (index, entry) in hits.iter().enumerate() {
        if hits[..index].contains(entry) {
            return Err(TestError::DuplicateHit {
                index,
                entry: format!("{entry:?}"),
            });
        }
    }
    Ok(())
}
