//! Math utilities and helpers.
//!
//! All math is double precision to match world coordinates.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::coords::BlockPos;

/// Ray for raycasting operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: DVec3,
    /// Ray direction (normalized, or zero for a degenerate ray)
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray. A zero direction stays zero.
    #[inline]
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from `origin` pointing at `target`.
    #[inline]
    #[must_use]
    pub fn towards(origin: DVec3, target: DVec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get a point along the ray at distance t
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-Aligned Bounding Box.
///
/// Intersection is closed on every face: boxes that only touch still
/// intersect, which is what lets a zero-sized sampling box hit a collider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB from two corners, in any order.
    #[inline]
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB centered at `center` with the given half-extents.
    #[inline]
    #[must_use]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Cube of half-width `half` around `center`.
    #[inline]
    #[must_use]
    pub fn cube(center: DVec3, half: f64) -> Self {
        Self::from_center_half_extents(center, DVec3::splat(half))
    }

    /// Box reaching `range` blocks out from the block containing `center`.
    ///
    /// Corners sit on block coordinates, so the box is `2 * range` wide on
    /// each axis regardless of where inside its block `center` lies.
    #[must_use]
    pub fn around_block(center: DVec3, range: i32) -> Self {
        let block = BlockPos::from(center).to_dvec3();
        let range = f64::from(range);
        Self::new(block - DVec3::splat(range), block + DVec3::splat(range))
    }

    /// Get the center of the AABB
    #[inline]
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB
    #[inline]
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Get the half-extents of the AABB
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> DVec3 {
        self.size() * 0.5
    }

    /// Same box moved by `offset`.
    #[inline]
    #[must_use]
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Check if a point is inside the AABB
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if this AABB intersects another
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Merge two AABBs
    #[inline]
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
