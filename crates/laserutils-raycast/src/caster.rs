//! The stepping ray caster.

use std::ops::ControlFlow;

use glam::DVec3;
use laserutils_core::{Aabb, BlockPos, ParticleEffect, Ray};
use tracing::{debug, trace};

use crate::builder::RayCastBuilder;
use crate::effect::{EffectEmitter, NoEffects};
use crate::settings::RayCastSettings;
use crate::world::{VoxelClass, VoxelState, WorldQuery};

pub(crate) type TargetFilter<'w, T> = Box<dyn Fn(&T) -> bool + 'w>;
pub(crate) type HitCallback<'w, T, R> = Box<dyn FnMut(&T) -> R + 'w>;

/// Why a trace stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The whole distance was covered.
    Exhausted,
    /// A blocking voxel was reached and blocks are not pierced.
    BlockedByVoxel,
    /// A new target was hit and targets are not pierced.
    StoppedAtTarget,
}

/// Summary of one firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOutcome {
    /// Number of sample points visited.
    pub samples: usize,
    /// Last sample visited, `None` if the distance allowed no samples.
    pub final_position: Option<DVec3>,
    pub termination: Termination,
}

impl TraceOutcome {
    /// Returns true if the ray was cut short by a voxel or a target.
    #[must_use]
    pub fn stopped_early(&self) -> bool {
        self.termination != Termination::Exhausted
    }
}

/// Immutable configuration of a [`RayCaster`].
pub struct RayCastConfig<'w, W: WorldQuery, P = ParticleEffect> {
    pub(crate) settings: RayCastSettings,
    pub(crate) blacklist: Vec<VoxelClass<W>>,
    pub(crate) target_class: W::TargetClass,
    pub(crate) target_filter: TargetFilter<'w, W::Target>,
    pub(crate) effects: Vec<P>,
}

impl<W: WorldQuery, P> RayCastConfig<'_, W, P> {
    #[must_use]
    pub const fn settings(&self) -> &RayCastSettings {
        &self.settings
    }

    /// Voxel classes that are never recorded as hits.
    #[must_use]
    pub fn blacklist(&self) -> &[VoxelClass<W>] {
        &self.blacklist
    }

    #[must_use]
    pub const fn target_class(&self) -> &W::TargetClass {
        &self.target_class
    }

    /// Effects replayed at each sample, in order.
    #[must_use]
    pub fn effects(&self) -> &[P] {
        &self.effects
    }

    /// Returns true if voxels of `class` are left out of the hit list.
    ///
    /// Blacklisting does not make a voxel passable.
    #[must_use]
    pub fn is_blacklisted(&self, class: &VoxelClass<W>) -> bool {
        self.blacklist.contains(class)
    }

    /// Returns true if `target` passes the target filter.
    #[must_use]
    pub fn accepts(&self, target: &W::Target) -> bool {
        (self.target_filter)(target)
    }
}

/// Casts rays from a fixed start point and records what they hit.
///
/// Built with [`RayCastBuilder`]. Every `fire_*` call runs one complete,
/// synchronous trace and replaces the current position; hit lists are
/// cleared first unless the matching persistence setting is on.
pub struct RayCaster<'w, W: WorldQuery, E: EffectEmitter = NoEffects, TR = (), VR = ()> {
    pub(crate) world: &'w W,
    pub(crate) start: DVec3,
    pub(crate) config: RayCastConfig<'w, W, E::Effect>,
    pub(crate) emitter: E,
    pub(crate) on_target_hit: Option<HitCallback<'w, W::Target, TR>>,
    pub(crate) on_voxel_hit: Option<HitCallback<'w, W::Voxel, VR>>,
    pub(crate) current_position: Option<DVec3>,
    pub(crate) hit_targets: Vec<W::Target>,
    pub(crate) hit_voxels: Vec<W::Voxel>,
    pub(crate) target_hit_result: Option<TR>,
    pub(crate) voxel_hit_result: Option<VR>,
}

impl<'w, W: WorldQuery> RayCaster<'w, W> {
    /// Start configuring a caster. Shorthand for [`RayCastBuilder::new`].
    pub fn builder(
        world: &'w W,
        start: DVec3,
        target_class: W::TargetClass,
    ) -> RayCastBuilder<'w, W> {
        RayCastBuilder::new(world, start, target_class)
    }
}

impl<'w, W: WorldQuery, E: EffectEmitter, TR, VR> RayCaster<'w, W, E, TR, VR> {
    /// Fire along `direction` for `distance` units from the start point.
    ///
    /// `direction` is normalized first; a zero direction samples the start
    /// point repeatedly.
    pub fn fire_in_direction(&mut self, direction: DVec3, distance: f64) -> TraceOutcome {
        self.trace(Ray::new(self.start, direction), distance)
    }

    /// Fire towards `destination`, continuing `overshoot` units past it.
    ///
    /// The base distance is the start-to-destination length rounded down to
    /// a whole number of blocks.
    pub fn fire_at_point(&mut self, destination: DVec3, overshoot: f64) -> TraceOutcome {
        let offset = destination - self.start;
        self.trace(
            Ray::new(self.start, offset),
            offset.length().floor() + overshoot,
        )
    }

    fn trace(&mut self, ray: Ray, distance: f64) -> TraceOutcome {
        let _span = tracing::trace_span!("raycast.trace", distance).entered();

        self.current_position = None;
        if !self.config.settings.persist_target_hits {
            self.hit_targets.clear();
        }
        if !self.config.settings.persist_voxel_hits {
            self.hit_voxels.clear();
        }

        let increment = self.config.settings.step_increment;
        let mut samples = 0_usize;
        let termination = loop {
            // Sample k sits at exactly k * increment
            let t = samples as f64 * increment;
            let within = t < distance;
            if !within {
                break Termination::Exhausted;
            }
            samples += 1;

            let sample = ray.at(t);
            self.current_position = Some(sample);
            if let ControlFlow::Break(termination) = self.visit(sample) {
                break termination;
            }
        };

        debug!(
            samples,
            ?termination,
            targets = self.hit_targets.len(),
            voxels = self.hit_voxels.len(),
            "Ray cast finished"
        );

        TraceOutcome {
            samples,
            final_position: self.current_position,
            termination,
        }
    }

    fn visit(&mut self, sample: DVec3) -> ControlFlow<Termination> {
        let settings = self.config.settings;
        let block = BlockPos::from(sample);

        let voxel = self.world.voxel_at(block);
        let blocking = voxel.is_blocking();
        if !self.config.is_blacklisted(&voxel.class()) && !self.hit_voxels.contains(&voxel) {
            trace!(%block, "Voxel hit");
            if let Some(callback) = self.on_voxel_hit.as_mut() {
                self.voxel_hit_result = Some(callback(&voxel));
            }
            self.hit_voxels.push(voxel);
        }
        if blocking && !settings.pierce_blocks {
            return ControlFlow::Break(Termination::BlockedByVoxel);
        }

        let region = Aabb::cube(sample, settings.step_size);
        let targets = self.world.targets_intersecting(
            &self.config.target_class,
            &region,
            &*self.config.target_filter,
        );
        for target in targets {
            if self.hit_targets.contains(&target) {
                continue;
            }
            trace!(?sample, "Target hit");
            if let Some(callback) = self.on_target_hit.as_mut() {
                self.target_hit_result = Some(callback(&target));
            }
            self.hit_targets.push(target);
            if !settings.pierce_targets {
                return ControlFlow::Break(Termination::StoppedAtTarget);
            }
        }

        for effect in &self.config.effects {
            self.emitter.emit(effect, sample);
        }
        ControlFlow::Continue(())
    }

    /// Where the ray starts.
    #[must_use]
    pub const fn start(&self) -> DVec3 {
        self.start
    }

    /// Last sample of the most recent fire, `None` before the first fire.
    #[must_use]
    pub const fn current_position(&self) -> Option<DVec3> {
        self.current_position
    }

    /// Distinct targets hit, in the order they were first hit.
    #[must_use]
    pub fn hit_targets(&self) -> &[W::Target] {
        &self.hit_targets
    }

    /// Distinct voxel states hit, in the order they were first hit.
    #[must_use]
    pub fn hit_voxels(&self) -> &[W::Voxel] {
        &self.hit_voxels
    }

    /// Value returned by the target callback for the latest new target.
    #[must_use]
    pub const fn target_hit_result(&self) -> Option<&TR> {
        self.target_hit_result.as_ref()
    }

    /// Value returned by the voxel callback for the latest new voxel.
    #[must_use]
    pub const fn voxel_hit_result(&self) -> Option<&VR> {
        self.voxel_hit_result.as_ref()
    }

    /// Overwrite the stored target callback result.
    pub fn set_target_hit_result(&mut self, result: TR) {
        self.target_hit_result = Some(result);
    }

    /// Overwrite the stored voxel callback result.
    pub fn set_voxel_hit_result(&mut self, result: VR) {
        self.voxel_hit_result = Some(result);
    }

    #[must_use]
    pub const fn config(&self) -> &RayCastConfig<'w, W, E::Effect> {
        &self.config
    }

    #[must_use]
    pub const fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Rejected;
    use crate::effect::LocalParticles;
    use approx::assert_relative_eq;
    use laserutils_core::{BlockId, Error, ParticleKind, Voxel};

    /// Targets are numbered unit boxes; voxels are a short list, air elsewhere.
    struct LineWorld {
        voxels: Vec<(BlockPos, Voxel)>,
        targets: Vec<(u32, Aabb)>,
    }

    impl LineWorld {
        fn empty() -> Self {
            Self {
                voxels: Vec::new(),
                targets: Vec::new(),
            }
        }

        fn with_voxel(mut self, pos: BlockPos, block: BlockId) -> Self {
            self.voxels.push((pos, Voxel::new(block)));
            self
        }

        fn with_target(mut self, id: u32, center: DVec3) -> Self {
            self.targets.push((id, Aabb::cube(center, 0.5)));
            self
        }
    }

    impl WorldQuery for LineWorld {
        type Voxel = Voxel;
        type Target = u32;
        type TargetClass = ();

        fn voxel_at(&self, pos: BlockPos) -> Voxel {
            self.voxels
                .iter()
                .find(|(p, _)| *p == pos)
                .map_or(Voxel::AIR, |(_, v)| *v)
        }

        fn targets_intersecting(
            &self,
            _class: &(),
            region: &Aabb,
            filter: &dyn Fn(&u32) -> bool,
        ) -> Vec<u32> {
            self.targets
                .iter()
                .filter(|(id, bounds)| bounds.intersects(region) && filter(id))
                .map(|(id, _)| *id)
                .collect()
        }
    }

    fn along_x(world: &LineWorld) -> RayCastBuilder<'_, LineWorld> {
        RayCaster::builder(world, DVec3::ZERO, ())
            .blacklist_class(BlockId::AIR)
            .step_increment(1.0)
            .unwrap()
    }

    #[test]
    fn empty_world_samples_every_increment() {
        let world = LineWorld::empty();
        let mut caster = along_x(&world).build(NoEffects::new());
        assert_eq!(caster.current_position(), None);

        let outcome = caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(outcome.samples, 10);
        assert_eq!(outcome.termination, Termination::Exhausted);
        assert_eq!(caster.current_position(), Some(DVec3::new(9.0, 0.0, 0.0)));
        assert!(caster.hit_targets().is_empty());
        assert!(caster.hit_voxels().is_empty());
    }

    #[test]
    fn solid_voxel_stops_ray() {
        let world = LineWorld::empty().with_voxel(BlockPos::new(5, 0, 0), BlockId::STONE);
        let mut caster = along_x(&world).build(NoEffects::new());

        let outcome = caster.fire_in_direction(DVec3::X * 3.0, 10.0);

        assert_eq!(outcome.termination, Termination::BlockedByVoxel);
        assert_eq!(outcome.samples, 6);
        assert_eq!(caster.current_position(), Some(DVec3::new(5.0, 0.0, 0.0)));
        assert_eq!(caster.hit_voxels(), &[Voxel::new(BlockId::STONE)]);
    }

    #[test]
    fn pierced_voxel_is_recorded_and_passed() {
        let world = LineWorld::empty().with_voxel(BlockPos::new(5, 0, 0), BlockId::STONE);
        let mut caster = along_x(&world).pierce_blocks().build(NoEffects::new());

        let outcome = caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(outcome.termination, Termination::Exhausted);
        assert_eq!(caster.hit_voxels(), &[Voxel::new(BlockId::STONE)]);
    }

    #[test]
    fn blacklisted_solid_voxel_blocks_without_recording() {
        let world = LineWorld::empty().with_voxel(BlockPos::new(4, 0, 0), BlockId::GLASS);
        let mut caster = along_x(&world)
            .blacklist_class(BlockId::GLASS)
            .build(NoEffects::new());

        let outcome = caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(outcome.termination, Termination::BlockedByVoxel);
        assert_eq!(caster.current_position(), Some(DVec3::new(4.0, 0.0, 0.0)));
        assert!(caster.hit_voxels().is_empty());
    }

    #[test]
    fn first_target_stops_ray() {
        let world = LineWorld::empty()
            .with_target(1, DVec3::new(3.0, 0.0, 0.0))
            .with_target(2, DVec3::new(6.0, 0.0, 0.0));
        let mut caster = along_x(&world).build(NoEffects::new());

        let outcome = caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(outcome.termination, Termination::StoppedAtTarget);
        assert_eq!(caster.hit_targets(), &[1]);
        assert_eq!(caster.current_position(), Some(DVec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn piercing_collects_every_target_once() {
        let world = LineWorld::empty()
            .with_target(1, DVec3::new(3.0, 0.0, 0.0))
            .with_target(2, DVec3::new(6.0, 0.0, 0.0));
        let mut caster = along_x(&world)
            .step_increment(0.25)
            .unwrap()
            .pierce_targets()
            .build(NoEffects::new());

        caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(caster.hit_targets(), &[1, 2]);
    }

    #[test]
    fn filter_hides_targets() {
        let world = LineWorld::empty()
            .with_target(1, DVec3::new(3.0, 0.0, 0.0))
            .with_target(2, DVec3::new(6.0, 0.0, 0.0));
        let mut caster = along_x(&world)
            .target_filter(|id: &u32| *id != 1)
            .build(NoEffects::new());

        caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(caster.hit_targets(), &[2]);
        assert!(!caster.config().accepts(&1));
    }

    #[test]
    fn step_size_widens_target_search() {
        let world = LineWorld::empty().with_target(7, DVec3::new(3.0, 1.2, 0.0));
        let mut narrow = along_x(&world).build(NoEffects::new());
        narrow.fire_in_direction(DVec3::X, 10.0);
        assert!(narrow.hit_targets().is_empty());

        let mut wide = along_x(&world)
            .step_size(0.75)
            .unwrap()
            .build(NoEffects::new());
        wide.fire_in_direction(DVec3::X, 10.0);
        assert_eq!(wide.hit_targets(), &[7]);
    }

    #[test]
    fn callbacks_fire_once_per_new_hit() {
        let world = LineWorld::empty()
            .with_voxel(BlockPos::new(2, 0, 0), BlockId::WATER)
            .with_target(1, DVec3::new(3.0, 0.0, 0.0))
            .with_target(2, DVec3::new(6.0, 0.0, 0.0));
        let mut target_calls = Vec::new();
        let mut caster = along_x(&world)
            .step_increment(0.1)
            .unwrap()
            .pierce_targets()
            .on_voxel_hit(|voxel: &Voxel| voxel.block_id)
            .on_target_hit(|id: &u32| {
                target_calls.push(*id);
                id * 10
            })
            .build(NoEffects::new());

        caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(caster.target_hit_result(), Some(&20));
        assert_eq!(caster.voxel_hit_result(), Some(&BlockId::WATER));
        drop(caster);
        assert_eq!(target_calls, vec![1, 2]);
    }

    #[test]
    fn result_setters_overwrite() {
        let world = LineWorld::empty();
        let mut caster = along_x(&world)
            .on_target_hit(|_: &u32| "hit")
            .on_voxel_hit(|_: &Voxel| 1_u8)
            .build(NoEffects::new());
        assert_eq!(caster.target_hit_result(), None);

        caster.set_target_hit_result("manual");
        caster.set_voxel_hit_result(9);

        assert_eq!(caster.target_hit_result(), Some(&"manual"));
        assert_eq!(caster.voxel_hit_result(), Some(&9));
    }

    #[test]
    fn hits_reset_between_fires_without_persistence() {
        let world = LineWorld::empty()
            .with_voxel(BlockPos::new(2, 0, 0), BlockId::FLOWER)
            .with_target(1, DVec3::new(3.0, 0.0, 0.0));
        let mut caster = along_x(&world).build(NoEffects::new());

        caster.fire_in_direction(DVec3::X, 10.0);
        assert_eq!(caster.hit_targets().len(), 1);
        assert_eq!(caster.hit_voxels().len(), 1);

        caster.fire_in_direction(-DVec3::X, 10.0);
        assert!(caster.hit_targets().is_empty());
        assert!(caster.hit_voxels().is_empty());
    }

    #[test]
    fn persistence_keeps_hits_across_fires() {
        let world = LineWorld::empty()
            .with_voxel(BlockPos::new(2, 0, 0), BlockId::FLOWER)
            .with_voxel(BlockPos::new(-3, 0, 0), BlockId::WATER)
            .with_target(1, DVec3::new(3.0, 0.0, 0.0))
            .with_target(2, DVec3::new(-5.0, 0.0, 0.0));
        let mut caster = along_x(&world)
            .persist_target_hits()
            .persist_voxel_hits()
            .build(NoEffects::new());

        caster.fire_in_direction(DVec3::X, 10.0);
        caster.fire_in_direction(-DVec3::X, 10.0);
        // A repeat fire finds nothing new and so does not stop at target 1
        let outcome = caster.fire_in_direction(DVec3::X, 10.0);

        assert_eq!(caster.hit_targets(), &[1, 2]);
        assert_eq!(
            caster.hit_voxels(),
            &[Voxel::new(BlockId::FLOWER), Voxel::new(BlockId::WATER)]
        );
        assert_eq!(outcome.termination, Termination::Exhausted);
    }

    #[test]
    fn fire_at_point_floors_base_distance() {
        let world = LineWorld::empty();
        let mut caster = along_x(&world).build(NoEffects::new());

        // |dest - start| = 4.6, floored to 4, plus 2 overshoot = 6
        let outcome = caster.fire_at_point(DVec3::new(4.6, 0.0, 0.0), 2.0);

        assert_eq!(outcome.samples, 6);
        assert_eq!(caster.current_position(), Some(DVec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn fire_at_point_follows_diagonal() {
        let world = LineWorld::empty();
        let mut caster = along_x(&world).build(NoEffects::new());

        caster.fire_at_point(DVec3::new(3.0, 4.0, 0.0), 0.0);

        let end = caster.current_position().unwrap();
        assert_relative_eq!(end.x, 0.6 * 4.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 0.8 * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_distance_takes_no_samples() {
        let world = LineWorld::empty();
        let mut caster = along_x(&world).build(NoEffects::new());
        caster.fire_in_direction(DVec3::X, 3.0);

        let outcome = caster.fire_in_direction(DVec3::X, 0.0);

        assert_eq!(outcome.samples, 0);
        assert_eq!(outcome.final_position, None);
        assert_eq!(caster.current_position(), None);
        assert!(!outcome.stopped_early());
    }

    #[test]
    fn effects_replay_at_unblocked_samples() {
        let world = LineWorld::empty().with_voxel(BlockPos::new(3, 0, 0), BlockId::STONE);
        let spark = ParticleEffect::single(ParticleKind::ElectricSpark);
        let smoke = ParticleEffect::single(ParticleKind::Smoke);
        let mut caster = along_x(&world)
            .effect(spark)
            .effect(smoke)
            .build(LocalParticles::new());

        caster.fire_in_direction(DVec3::X, 10.0);

        let spawned = caster.emitter_mut().drain();
        // Samples 0, 1, 2 emit; sample 3 is blocked before emission
        assert_eq!(spawned.len(), 6);
        assert_eq!(spawned[0].effect, spark);
        assert_eq!(spawned[1].effect, smoke);
        assert_eq!(spawned[5].position, DVec3::new(2.0, 0.0, 0.0));
        assert!(caster.emitter().spawned().is_empty());
    }

    #[test]
    fn invalid_increment_is_rejected() {
        let world = LineWorld::empty();
        let result = RayCaster::builder(&world, DVec3::ZERO, ()).step_increment(0.0);
        assert!(matches!(
            result.map_err(Rejected::into_error),
            Err(Error::InvalidStepIncrement(_))
        ));
    }
}
