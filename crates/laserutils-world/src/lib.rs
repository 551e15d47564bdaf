//! In-memory voxel level for LaserUtils.
//!
//! [`SandboxLevel`] pairs a sparse voxel grid with an entity world and
//! answers the queries a ray caster makes.

pub mod grid;
pub mod level;

pub use grid::VoxelGrid;
pub use level::SandboxLevel;
