//! Particle effect descriptors.
//!
//! These describe *what* to show; emitting them is up to whichever side
//! (authoritative or presentation) owns the caster.

use serde::{Deserialize, Serialize};

/// Particle type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Flame,
    SoulFlame,
    Smoke,
    ElectricSpark,
    EndRod,
    /// Colored dust with an RGB tint and scale.
    Dust { color: [u8; 3], scale: f32 },
}

/// A particle effect replayed at ray sample points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffect {
    /// Particle type
    pub kind: ParticleKind,
    /// Particles spawned per emission
    pub count: u32,
    /// Random spread around the emission point on each axis
    pub spread: f64,
}

impl ParticleEffect {
    /// One particle, no spread.
    #[must_use]
    pub const fn single(kind: ParticleKind) -> Self {
        Self {
            kind,
            count: 1,
            spread: 0.0,
        }
    }

    /// Set the particle count.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the spread.
    #[must_use]
    pub const fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }
}

impl From<ParticleKind> for ParticleEffect {
    fn from(kind: ParticleKind) -> Self {
        Self::single(kind)
    }
}
