//! Core voxel types.

use serde::{Deserialize, Serialize};

/// Unique identifier for a block type.
///
/// Block ID 0 is reserved for air (empty space). The block type is the
/// "class" of a voxel: two voxels with different metadata share a class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air block (empty space)
    pub const AIR: Self = Self(0);
    /// Stone block
    pub const STONE: Self = Self(1);
    /// Dirt block
    pub const DIRT: Self = Self(2);
    /// Grass block
    pub const GRASS: Self = Self(3);
    /// Sand block
    pub const SAND: Self = Self(4);
    /// Water block
    pub const WATER: Self = Self(5);
    /// Tree log block
    pub const LOG: Self = Self(6);
    /// Tree leaves block
    pub const LEAVES: Self = Self(7);
    /// Flower block
    pub const FLOWER: Self = Self(8);
    /// Glass block
    pub const GLASS: Self = Self(9);

    /// Returns true if this block is air (empty)
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this block stops movement and unpierced rays.
    ///
    /// Air, fluids and plants are passable.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::AIR | Self::WATER | Self::FLOWER)
    }

    /// Registry name of the block
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AIR => "air",
            Self::STONE => "stone",
            Self::DIRT => "dirt",
            Self::GRASS => "grass",
            Self::SAND => "sand",
            Self::WATER => "water",
            Self::LOG => "log",
            Self::LEAVES => "leaves",
            Self::FLOWER => "flower",
            Self::GLASS => "glass",
            _ => "unknown",
        }
    }

    /// Look up a block by registry name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let id = match name {
            "air" => Self::AIR,
            "stone" => Self::STONE,
            "dirt" => Self::DIRT,
            "grass" => Self::GRASS,
            "sand" => Self::SAND,
            "water" => Self::WATER,
            "log" => Self::LOG,
            "leaves" => Self::LEAVES,
            "flower" => Self::FLOWER,
            "glass" => Self::GLASS,
            _ => return None,
        };
        Some(id)
    }
}

/// A single voxel: block type plus state metadata.
///
/// This is the block *state*; equality covers both fields, so the same block
/// type with different metadata counts as a different state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    /// The block type
    pub block_id: BlockId,
    /// Additional metadata (orientation, state, etc.)
    pub metadata: u16,
}

impl Voxel {
    /// Air voxel
    pub const AIR: Self = Self {
        block_id: BlockId::AIR,
        metadata: 0,
    };

    /// Create a new voxel with the given block ID
    #[inline]
    #[must_use]
    pub const fn new(block_id: BlockId) -> Self {
        Self {
            block_id,
            metadata: 0,
        }
    }

    /// Create a new voxel with block ID and metadata
    #[inline]
    #[must_use]
    pub const fn with_metadata(block_id: BlockId, metadata: u16) -> Self {
        Self { block_id, metadata }
    }

    /// Returns true if this voxel is air
    #[inline]
    #[must_use]
    pub const fn is_air(&self) -> bool {
        self.block_id.is_air()
    }

    /// Returns true if this voxel is solid
    #[inline]
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.block_id.is_solid()
    }
}
