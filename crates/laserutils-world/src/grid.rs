//! Sparse voxel storage.

use hashbrown::HashMap;
use laserutils_core::{BlockPos, Voxel};

/// Sparse voxel grid. Positions that were never set read as air.
#[derive(Debug, Clone, Default)]
pub struct VoxelGrid {
    voxels: HashMap<BlockPos, Voxel>,
}

impl VoxelGrid {
    /// Create an empty (all air) grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Voxel at `pos`, air if unset.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> Voxel {
        self.voxels.get(&pos).copied().unwrap_or(Voxel::AIR)
    }

    /// Set the voxel at `pos`. Setting air frees the slot.
    ///
    /// Returns the previous voxel.
    pub fn set(&mut self, pos: BlockPos, voxel: Voxel) -> Voxel {
        let previous = if voxel.is_air() {
            self.voxels.remove(&pos)
        } else {
            self.voxels.insert(pos, voxel)
        };
        previous.unwrap_or(Voxel::AIR)
    }

    /// Fill the box between two corners, both inclusive.
    ///
    /// Returns the number of positions written.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, voxel: Voxel) -> usize {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        let (min_z, max_z) = (a.z.min(b.z), a.z.max(b.z));

        let mut written = 0;
        for z in min_z..=max_z {
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    self.set(BlockPos::new(x, y, z), voxel);
                    written += 1;
                }
            }
        }
        written
    }

    /// Number of non-air voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Check if the grid holds only air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Reset every position to air.
    pub fn clear(&mut self) {
        self.voxels.clear();
    }
}
