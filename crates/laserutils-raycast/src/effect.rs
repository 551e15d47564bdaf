//! Effect emission at ray sample points.
//!
//! Emission is the one step of a trace that depends on where the caster
//! runs. The authoritative side broadcasts each effect to observers; the
//! presentation side spawns it locally. Both are [`EffectEmitter`]s, and the
//! caster takes whichever it was built with.

use std::marker::PhantomData;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use glam::DVec3;
use laserutils_core::ParticleEffect;

/// Default queue depth of a broadcast observer.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 256;

/// Emits a visual effect at a point in the world.
pub trait EffectEmitter {
    /// Effect descriptor this emitter understands.
    type Effect;

    /// Emit `effect` at `at`.
    fn emit(&mut self, effect: &Self::Effect, at: DVec3);
}

/// Discards every effect.
#[derive(Debug)]
pub struct NoEffects<P = ParticleEffect>(PhantomData<P>);

impl<P> NoEffects<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P> Default for NoEffects<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EffectEmitter for NoEffects<P> {
    type Effect = P;

    fn emit(&mut self, _effect: &P, _at: DVec3) {}
}

/// Adapts a closure into an emitter.
pub struct EmitFn<P, F> {
    f: F,
    _effect: PhantomData<fn(&P)>,
}

impl<P, F: FnMut(&P, DVec3)> EmitFn<P, F> {
    pub const fn new(f: F) -> Self {
        Self {
            f,
            _effect: PhantomData,
        }
    }
}

impl<P, F: FnMut(&P, DVec3)> EffectEmitter for EmitFn<P, F> {
    type Effect = P;

    fn emit(&mut self, effect: &P, at: DVec3) {
        (self.f)(effect, at);
    }
}

/// An effect sent to an observer.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectPacket<P = ParticleEffect> {
    pub effect: P,
    pub position: DVec3,
}

/// Authoritative-side emitter: sends every effect to all subscribed
/// observers.
///
/// Each observer gets its own bounded queue. A full queue drops the packet
/// for that observer only; a disconnected observer is unsubscribed.
#[derive(Debug)]
pub struct ParticleBroadcaster<P = ParticleEffect> {
    observers: Vec<Sender<EffectPacket<P>>>,
    sent: u64,
    dropped: u64,
}

impl<P: Clone> ParticleBroadcaster<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
            sent: 0,
            dropped: 0,
        }
    }

    /// Subscribe a new observer with the default queue depth.
    pub fn subscribe(&mut self) -> Receiver<EffectPacket<P>> {
        self.subscribe_with_capacity(DEFAULT_OBSERVER_CAPACITY)
    }

    /// Subscribe a new observer whose queue holds at most `capacity` packets.
    pub fn subscribe_with_capacity(&mut self, capacity: usize) -> Receiver<EffectPacket<P>> {
        let (tx, rx) = channel::bounded(capacity);
        self.observers.push(tx);
        rx
    }

    /// Number of connected observers as of the last emission.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Packets delivered so far, counted per observer.
    #[must_use]
    pub const fn sent(&self) -> u64 {
        self.sent
    }

    /// Packets dropped because an observer's queue was full.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<P: Clone> Default for ParticleBroadcaster<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> EffectEmitter for ParticleBroadcaster<P> {
    type Effect = P;

    fn emit(&mut self, effect: &P, at: DVec3) {
        let packet = EffectPacket {
            effect: effect.clone(),
            position: at,
        };
        let (mut sent, mut dropped) = (0_u64, 0_u64);
        self.observers
            .retain(|observer| match observer.try_send(packet.clone()) {
                Ok(()) => {
                    sent += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    dropped += 1;
                    true
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!("Effect observer disconnected, unsubscribing");
                    false
                }
            });
        self.sent += sent;
        self.dropped += dropped;
    }
}

/// An effect spawned on the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedEffect<P = ParticleEffect> {
    pub effect: P,
    pub position: DVec3,
}

/// Presentation-side emitter: spawns effects into a local buffer for the
/// renderer to drain.
#[derive(Debug)]
pub struct LocalParticles<P = ParticleEffect> {
    spawned: Vec<SpawnedEffect<P>>,
}

impl<P: Clone> LocalParticles<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spawned: Vec::new(),
        }
    }

    /// Effects spawned since the last drain, oldest first.
    #[must_use]
    pub fn spawned(&self) -> &[SpawnedEffect<P>] {
        &self.spawned
    }

    /// Take every pending effect.
    pub fn drain(&mut self) -> Vec<SpawnedEffect<P>> {
        std::mem::take(&mut self.spawned)
    }
}

impl<P: Clone> Default for LocalParticles<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> EffectEmitter for LocalParticles<P> {
    type Effect = P;

    fn emit(&mut self, effect: &P, at: DVec3) {
        self.spawned.push(SpawnedEffect {
            effect: effect.clone(),
            position: at,
        });
    }
}
