//! Builder for [`RayCaster`].

use std::fmt;

use glam::DVec3;
use laserutils_core::{Error, ParticleEffect};

use crate::caster::{HitCallback, RayCastConfig, RayCaster, TargetFilter};
use crate::effect::EffectEmitter;
use crate::settings::RayCastSettings;
use crate::world::{VoxelClass, WorldQuery};

/// Collects everything a [`RayCaster`] needs before it can fire.
///
/// `P` is the effect type replayed at each step, `TR` and `VR` are the
/// return types of the target and voxel hit callbacks. Registering a
/// callback replaces any earlier one and changes the builder's type to
/// match the new callback.
pub struct RayCastBuilder<'w, W: WorldQuery, P = ParticleEffect, TR = (), VR = ()> {
    world: &'w W,
    start: DVec3,
    settings: RayCastSettings,
    blacklist: Vec<VoxelClass<W>>,
    target_class: W::TargetClass,
    target_filter: TargetFilter<'w, W::Target>,
    effects: Vec<P>,
    on_target_hit: Option<HitCallback<'w, W::Target, TR>>,
    on_voxel_hit: Option<HitCallback<'w, W::Voxel, VR>>,
}

/// A rejected configuration call.
///
/// Carries the builder back unchanged so the caller can keep using it.
pub struct Rejected<B> {
    pub builder: B,
    pub error: Error,
}

impl<B> Rejected<B> {
    /// Drop the builder and keep the error.
    #[must_use]
    pub fn into_error(self) -> Error {
        self.error
    }

    /// Drop the error and recover the builder.
    #[must_use]
    pub fn into_builder(self) -> B {
        self.builder
    }
}

impl<B> fmt::Debug for Rejected<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<B> From<Rejected<B>> for Error {
    fn from(rejected: Rejected<B>) -> Self {
        rejected.error
    }
}

/// Result of a fallible builder call.
pub type Configured<B> = Result<B, Rejected<B>>;

impl<'w, W: WorldQuery> RayCastBuilder<'w, W> {
    /// Start a caster at `start` that targets `target_class`.
    ///
    /// Defaults: step increment 0.3, step size 0, no piercing, no
    /// persistence, every target accepted, nothing blacklisted, no effects.
    pub fn new(world: &'w W, start: DVec3, target_class: W::TargetClass) -> Self {
        Self {
            world,
            start,
            settings: RayCastSettings::default(),
            blacklist: Vec::new(),
            target_class,
            target_filter: Box::new(|_: &W::Target| true),
            effects: Vec::new(),
            on_target_hit: None,
            on_voxel_hit: None,
        }
    }
}

impl<'w, W: WorldQuery, P, TR, VR> RayCastBuilder<'w, W, P, TR, VR> {
    /// Keep going through solid voxels.
    #[must_use]
    pub fn pierce_blocks(mut self) -> Self {
        self.settings.pierce_blocks = true;
        self
    }

    /// Keep going after hitting a target.
    #[must_use]
    pub fn pierce_targets(mut self) -> Self {
        self.settings.pierce_targets = true;
        self
    }

    /// Keep target hits from earlier fires.
    #[must_use]
    pub fn persist_target_hits(mut self) -> Self {
        self.settings.persist_target_hits = true;
        self
    }

    /// Keep voxel hits from earlier fires.
    #[must_use]
    pub fn persist_voxel_hits(mut self) -> Self {
        self.settings.persist_voxel_hits = true;
        self
    }

    /// Distance between samples. Fails unless `step_increment > 0`.
    ///
    /// On failure the builder comes back untouched inside [`Rejected`].
    pub fn step_increment(mut self, step_increment: f64) -> Configured<Self> {
        match RayCastSettings::check_step_increment(step_increment) {
            Ok(value) => {
                self.settings.step_increment = value;
                Ok(self)
            }
            Err(error) => Err(self.reject(error)),
        }
    }

    /// Half-width of the target sampling box. Fails if `step_size < 0`.
    pub fn step_size(mut self, step_size: f64) -> Configured<Self> {
        match RayCastSettings::check_step_size(step_size) {
            Ok(value) => {
                self.settings.step_size = value;
                Ok(self)
            }
            Err(error) => Err(self.reject(error)),
        }
    }

    /// Replace all settings at once, after validating them.
    pub fn settings(mut self, settings: RayCastSettings) -> Configured<Self> {
        if let Err(error) = settings.validate() {
            return Err(self.reject(error));
        }
        self.settings = settings;
        Ok(self)
    }

    fn reject(self, error: Error) -> Rejected<Self> {
        Rejected {
            builder: self,
            error,
        }
    }

    /// Only targets passing `filter` are hit.
    #[must_use]
    pub fn target_filter(mut self, filter: impl Fn(&W::Target) -> bool + 'w) -> Self {
        self.target_filter = Box::new(filter);
        self
    }

    /// Never record voxels of these classes. They still block the ray.
    #[must_use]
    pub fn blacklist(mut self, classes: impl IntoIterator<Item = VoxelClass<W>>) -> Self {
        self.blacklist.extend(classes);
        self
    }

    /// Never record voxels of `class`. It still blocks the ray.
    #[must_use]
    pub fn blacklist_class(mut self, class: VoxelClass<W>) -> Self {
        self.blacklist.push(class);
        self
    }

    /// Replay `effect` at every sample.
    #[must_use]
    pub fn effect(mut self, effect: P) -> Self {
        self.effects.push(effect);
        self
    }

    /// Replay each of `effects` at every sample.
    #[must_use]
    pub fn effects(mut self, effects: impl IntoIterator<Item = P>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Drop every effect.
    #[must_use]
    pub fn clear_effects(mut self) -> Self {
        self.effects.clear();
        self
    }

    /// Convert the effect list to another effect type.
    #[must_use]
    pub fn map_effects<Q>(self, f: impl FnMut(P) -> Q) -> RayCastBuilder<'w, W, Q, TR, VR> {
        RayCastBuilder {
            world: self.world,
            start: self.start,
            settings: self.settings,
            blacklist: self.blacklist,
            target_class: self.target_class,
            target_filter: self.target_filter,
            effects: self.effects.into_iter().map(f).collect(),
            on_target_hit: self.on_target_hit,
            on_voxel_hit: self.on_voxel_hit,
        }
    }

    /// Run `callback` on every newly hit target.
    ///
    /// Its latest return value is available from
    /// [`RayCaster::target_hit_result`].
    #[must_use]
    pub fn on_target_hit<R>(
        self,
        callback: impl FnMut(&W::Target) -> R + 'w,
    ) -> RayCastBuilder<'w, W, P, R, VR> {
        RayCastBuilder {
            world: self.world,
            start: self.start,
            settings: self.settings,
            blacklist: self.blacklist,
            target_class: self.target_class,
            target_filter: self.target_filter,
            effects: self.effects,
            on_target_hit: Some(Box::new(callback)),
            on_voxel_hit: self.on_voxel_hit,
        }
    }

    /// Run `callback` on every newly hit, non-blacklisted voxel state.
    ///
    /// Its latest return value is available from
    /// [`RayCaster::voxel_hit_result`].
    #[must_use]
    pub fn on_voxel_hit<R>(
        self,
        callback: impl FnMut(&W::Voxel) -> R + 'w,
    ) -> RayCastBuilder<'w, W, P, TR, R> {
        RayCastBuilder {
            world: self.world,
            start: self.start,
            settings: self.settings,
            blacklist: self.blacklist,
            target_class: self.target_class,
            target_filter: self.target_filter,
            effects: self.effects,
            on_target_hit: self.on_target_hit,
            on_voxel_hit: Some(Box::new(callback)),
        }
    }

    /// Settings as configured so far.
    #[must_use]
    pub const fn current_settings(&self) -> &RayCastSettings {
        &self.settings
    }

    /// Finish configuration, emitting effects through `emitter`.
    pub fn build<E>(self, emitter: E) -> RayCaster<'w, W, E, TR, VR>
    where
        E: EffectEmitter<Effect = P>,
    {
        RayCaster {
            world: self.world,
            start: self.start,
            config: RayCastConfig {
                settings: self.settings,
                blacklist: self.blacklist,
                target_class: self.target_class,
                target_filter: self.target_filter,
                effects: self.effects,
            },
            emitter,
            on_target_hit: self.on_target_hit,
            on_voxel_hit: self.on_voxel_hit,
            current_position: None,
            hit_targets: Vec::new(),
            hit_voxels: Vec::new(),
            target_hit_result: None,
            voxel_hit_result: None,
        }
    }
}

impl<W: WorldQuery, P: PartialEq, TR, VR> RayCastBuilder<'_, W, P, TR, VR> {
    /// Stop replaying the first effect equal to `effect`.
    #[must_use]
    pub fn remove_effect(mut self, effect: &P) -> Self {
        if let Some(index) = self.effects.iter().position(|e| e == effect) {
            self.effects.remove(index);
        }
        self
    }
}
