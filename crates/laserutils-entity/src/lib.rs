//! Entity components for LaserUtils.
//!
//! Uses hecs as the ECS backend. Ray targets are plain [`Entity`] handles;
//! their shape and type live in the components below.

use glam::DVec3;
pub use hecs::{Entity, World};
use laserutils_core::Aabb;
use serde::{Deserialize, Serialize};

/// Transform component. Position is the center of the entity's collider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: DVec3,
}

impl Transform {
    #[must_use]
    pub const fn at(position: DVec3) -> Self {
        Self { position }
    }
}

/// Collision box component, relative to [`Transform::position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: DVec3,
}

impl Collider {
    /// Cube collider with the given full edge length.
    #[must_use]
    pub fn cube(size: f64) -> Self {
        Self {
            half_extents: DVec3::splat(size * 0.5),
        }
    }

    /// World-space bounds for an entity at `transform`.
    #[must_use]
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_half_extents(transform.position, self.half_extents)
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::cube(1.0)
    }
}

/// Concrete entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Zombie,
    Skeleton,
    Villager,
    ArmorStand,
    Arrow,
    Item,
}

/// Category of entities a ray may target.
///
/// Classes nest: every monster is living, every living entity is `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    #[default]
    Any,
    Living,
    Monster,
    Player,
    Projectile,
    Item,
}

impl EntityKind {
    /// Returns true if this kind belongs to `class`.
    #[must_use]
    pub const fn is_a(self, class: EntityClass) -> bool {
        match class {
            EntityClass::Any => true,
            EntityClass::Living => matches!(
                self,
                Self::Player | Self::Zombie | Self::Skeleton | Self::Villager
            ),
            EntityClass::Monster => matches!(self, Self::Zombie | Self::Skeleton),
            EntityClass::Player => matches!(self, Self::Player),
            EntityClass::Projectile => matches!(self, Self::Arrow),
            EntityClass::Item => matches!(self, Self::Item),
        }
    }
}
