//! The world surface a ray caster queries.

use laserutils_core::{Aabb, BlockId, BlockPos, Voxel};

/// A voxel state as seen by the ray caster.
pub trait VoxelState: Clone + PartialEq {
    /// Coarse type of the voxel, used for blacklisting.
    type Class: PartialEq;

    /// The class this state belongs to.
    fn class(&self) -> Self::Class;

    /// Whether this state stops a ray that does not pierce blocks.
    fn is_blocking(&self) -> bool;
}

impl VoxelState for Voxel {
    type Class = BlockId;

    fn class(&self) -> BlockId {
        self.block_id
    }

    fn is_blocking(&self) -> bool {
        self.is_solid()
    }
}

/// Class of the voxels a world returns.
pub type VoxelClass<W> = <<W as WorldQuery>::Voxel as VoxelState>::Class;

/// Read-only queries against a voxel world and the targets living in it.
///
/// Positions the world knows nothing about (unloaded, out of bounds, void)
/// should come back as a passable voxel.
pub trait WorldQuery {
    /// Voxel state stored at a block position.
    type Voxel: VoxelState;
    /// Handle to something a ray can hit. Equality must identify the target.
    type Target: Clone + PartialEq;
    /// Restriction on which targets a query returns.
    type TargetClass;

    /// Voxel occupying `pos`.
    fn voxel_at(&self, pos: BlockPos) -> Self::Voxel;

    /// All targets of `class` that intersect `region` and pass `filter`.
    ///
    /// The caster visits them in the returned order.
    fn targets_intersecting(
        &self,
        class: &Self::TargetClass,
        region: &Aabb,
        filter: &dyn Fn(&Self::Target) -> bool,
    ) -> Vec<Self::Target>;
}
