//! Core types, math, and errors for LaserUtils.
//!
//! This crate provides the foundational types shared by the ray caster and
//! the worlds it runs against:
//! - Block coordinates and flooring from world space
//! - Voxel and block types with solidity
//! - Ray and axis-aligned bounding box math (double precision)
//! - Particle effect descriptors
//! - Common error types

pub mod coords;
pub mod effect;
pub mod error;
pub mod math;
pub mod types;

pub use coords::BlockPos;
pub use effect::{ParticleEffect, ParticleKind};
pub use error::{Error, Result};
pub use math::{Aabb, Ray};
pub use types::{BlockId, Voxel};
