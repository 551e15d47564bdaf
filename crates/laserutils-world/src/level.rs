//! A level the ray caster can run against.

use glam::DVec3;
use laserutils_core::{Aabb, BlockPos, Voxel};
use laserutils_entity::{Collider, Entity, EntityClass, EntityKind, Transform, World};
use laserutils_raycast::WorldQuery;

use crate::grid::VoxelGrid;

/// Voxel grid plus the entities standing in it.
#[derive(Default)]
pub struct SandboxLevel {
    voxels: VoxelGrid,
    entities: World,
}

impl SandboxLevel {
    /// Create an empty level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one voxel, returning the previous one.
    pub fn set_voxel(&mut self, pos: BlockPos, voxel: Voxel) -> Voxel {
        self.voxels.set(pos, voxel)
    }

    /// Fill an inclusive box of voxels.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, voxel: Voxel) -> usize {
        let written = self.voxels.fill(a, b, voxel);
        tracing::trace!(%a, %b, written, "Filled voxel region");
        written
    }

    /// Spawn an entity centered on `position`.
    pub fn spawn(&mut self, kind: EntityKind, position: DVec3, collider: Collider) -> Entity {
        let entity = self
            .entities
            .spawn((Transform::at(position), collider, kind));
        tracing::trace!(?entity, ?kind, ?position, "Spawned entity");
        entity
    }

    /// Remove an entity. Returns false if it was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.entities.despawn(entity).is_ok()
    }

    /// Move an entity's center to `position`. Returns false if it does not exist.
    pub fn move_entity(&mut self, entity: Entity, position: DVec3) -> bool {
        match self.entities.get::<&mut Transform>(entity) {
            Ok(mut transform) => {
                transform.position = position;
                true
            }
            Err(_) => false,
        }
    }

    /// World-space bounds of an entity.
    #[must_use]
    pub fn bounds_of(&self, entity: Entity) -> Option<Aabb> {
        let transform = self.entities.get::<&Transform>(entity).ok()?;
        let collider = self.entities.get::<&Collider>(entity).ok()?;
        Some(collider.bounds(&transform))
    }

    /// Kind of an entity.
    #[must_use]
    pub fn kind_of(&self, entity: Entity) -> Option<EntityKind> {
        self.entities.get::<&EntityKind>(entity).ok().map(|kind| *kind)
    }

    /// Check if an entity is alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len() as usize
    }
}

impl WorldQuery for SandboxLevel {
    type Voxel = Voxel;
    type Target = Entity;
    type TargetClass = EntityClass;

    fn voxel_at(&self, pos: BlockPos) -> Voxel {
        self.voxels.get(pos)
    }

    /// Results are ordered by entity id so repeated queries agree.
    fn targets_intersecting(
        &self,
        class: &EntityClass,
        region: &Aabb,
        filter: &dyn Fn(&Entity) -> bool,
    ) -> Vec<Entity> {
        let mut query = self
            .entities
            .query::<(&Transform, &Collider, &EntityKind)>();
        let mut found: Vec<Entity> = query
            .iter()
            .filter(|(_, (transform, collider, kind))| {
                kind.is_a(*class) && collider.bounds(transform).intersects(region)
            })
            .map(|(entity, _)| entity)
            .filter(|entity| filter(entity))
            .collect();
        found.sort_unstable_by_key(|entity| entity.id());
        found
    }
}
