//! Block coordinates for the voxel world.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Position of a single block in world block coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this position by the given deltas
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Minimum corner of the block in world space
    #[inline]
    #[must_use]
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Center of the block in world space
    #[inline]
    #[must_use]
    pub fn center(self) -> DVec3 {
        self.to_dvec3() + DVec3::splat(0.5)
    }
}

/// Floors each component, so `-0.5` lands in block `-1`.
impl From<DVec3> for BlockPos {
    fn from(v: DVec3) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32, v.z.floor() as i32)
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
