//! Stepped ray casting through a voxel world and its entities.
//!
//! A [`RayCaster`] walks a ray from a fixed start point in increments of
//! [`RayCastSettings::step_increment`]. At each sample it looks up the
//! voxel under the floored sample position and asks the world for targets
//! inside a small box around the sample, recording every distinct hit.
//!
//! ```ignore
//! let mut caster = RayCastBuilder::new(&level, eye, EntityClass::Living)
//!     .step_increment(0.25)?
//!     .pierce_targets()
//!     .effect(ParticleKind::ElectricSpark.into())
//!     .on_target_hit(|entity| *entity)
//!     .build(broadcaster);
//!
//! let outcome = caster.fire_in_direction(look, 30.0);
//! for entity in caster.hit_targets() {
//!     // ...
//! }
//! ```
//!
//! A rejected setting hands the builder back inside [`Rejected`], so the
//! configuration made before it is never lost.
//!
//! The world is anything implementing [`WorldQuery`]; the visual side effect
//! at each step goes through an [`EffectEmitter`], which is where the
//! authoritative ([`ParticleBroadcaster`]) and presentation
//! ([`LocalParticles`]) variants differ.

mod builder;
mod caster;
pub mod effect;
mod settings;
pub mod world;

pub use builder::{Configured, RayCastBuilder, Rejected};
pub use caster::{RayCastConfig, RayCaster, Termination, TraceOutcome};
pub use effect::{
    EffectEmitter, EffectPacket, EmitFn, LocalParticles, NoEffects, ParticleBroadcaster,
    SpawnedEffect,
};
pub use settings::RayCastSettings;
pub use world::{VoxelClass, VoxelState, WorldQuery};
