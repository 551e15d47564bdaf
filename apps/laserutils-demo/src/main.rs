//! LaserUtils demo
//!
//! Builds a small level with a grass floor, stone walls and zombies, then
//! fires a laser from a player's eye along +X and logs every hit.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p laserutils-demo -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--distance <D>`: How far the laser travels (default: 24)
//! - `--step-increment <D>`: Distance between samples
//! - `--step-size <D>`: Half-width of the target sampling box
//! - `--pierce-blocks`: Keep going through walls
//! - `--pierce-targets`: Keep going through zombies
//! - `--wall-at <X>`: Place a wall at block column X (repeatable)
//! - `--target-at <X>`: Place a zombie centered at X (repeatable)
//! - `--config <FILE>`: TOML file with ray cast settings; flags override it
//!
//! ## Examples
//!
//! ```bash
//! # Laser stops at the first zombie
//! cargo run -p laserutils-demo -- --target-at 6 --target-at 9
//!
//! # Cut through a wall and both zombies behind it
//! cargo run -p laserutils-demo -- --wall-at 4 --target-at 6 --target-at 9 --pierce-blocks --pierce-targets
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod scene;

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use clap::Parser;
use glam::DVec3;
use laserutils_core::{BlockId, Error, ParticleEffect, ParticleKind, Voxel};
use laserutils_entity::{Entity, EntityClass};
use laserutils_raycast::{
    ParticleBroadcaster, RayCastSettings, RayCaster, Rejected, VoxelState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "laserutils-demo", about = "Fire a laser through a sandbox level")]
struct Args {
    /// How far the laser travels
    #[arg(long, default_value_t = 24.0)]
    distance: f64,

    /// Distance between samples
    #[arg(long)]
    step_increment: Option<f64>,

    /// Half-width of the target sampling box
    #[arg(long)]
    step_size: Option<f64>,

    /// Keep going through walls
    #[arg(long)]
    pierce_blocks: bool,

    /// Keep going through zombies
    #[arg(long)]
    pierce_targets: bool,

    /// Block column of a wall
    #[arg(long = "wall-at")]
    walls: Vec<i32>,

    /// Center of a zombie
    #[arg(long = "target-at")]
    targets: Vec<f64>,

    /// TOML file with ray cast settings
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// File settings (or defaults) with command-line overrides applied.
    fn settings(&self) -> laserutils_core::Result<RayCastSettings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => RayCastSettings::default(),
        };
        if let Some(step_increment) = self.step_increment {
            settings.step_increment = step_increment;
        }
        if let Some(step_size) = self.step_size {
            settings.step_size = step_size;
        }
        settings.pierce_blocks |= self.pierce_blocks;
        settings.pierce_targets |= self.pierce_targets;
        settings.validate()?;
        Ok(settings)
    }
}

fn load_settings(path: &Path) -> laserutils_core::Result<RayCastSettings> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = args.settings().context("invalid ray cast settings")?;
    info!(?settings, "LaserUtils demo starting");

    let scene = Scene::build(&args.walls, &args.targets);
    info!(
        walls = args.walls.len(),
        targets = scene.targets.len(),
        eye = ?scene.eye,
        "Scene ready"
    );

    let mut broadcaster: ParticleBroadcaster = ParticleBroadcaster::new();
    let observer = broadcaster.subscribe();
    let viewer = thread::spawn(move || observer.iter().count());

    let level = &scene.level;
    let mut caster = RayCaster::builder(level, scene.eye, EntityClass::Living)
        .settings(settings)
        .map_err(Rejected::into_error)?
        .blacklist_class(BlockId::AIR)
        .effect(ParticleEffect::single(ParticleKind::ElectricSpark))
        .effect(ParticleEffect::single(ParticleKind::Smoke).with_spread(0.05))
        .on_target_hit(move |entity: &Entity| {
            let bounds = level.bounds_of(*entity);
            info!(?entity, kind = ?level.kind_of(*entity), ?bounds, "Laser hit entity");
            *entity
        })
        .on_voxel_hit(|voxel: &Voxel| {
            info!(
                block = voxel.block_id.name(),
                solid = voxel.is_blocking(),
                "Laser hit block"
            );
            voxel.class()
        })
        .build(broadcaster);

    let outcome = caster.fire_in_direction(DVec3::X, args.distance);

    info!(
        termination = ?outcome.termination,
        samples = outcome.samples,
        end = ?outcome.final_position,
        targets = caster.hit_targets().len(),
        blocks = caster.hit_voxels().len(),
        last_target = ?caster.target_hit_result(),
        last_block = ?caster.voxel_hit_result(),
        "Laser finished"
    );

    let sent = caster.emitter().sent();
    drop(caster);
    let received = viewer
        .join()
        .map_err(|_| anyhow::anyhow!("effect observer thread panicked"))?;
    info!(sent, received, "Effects delivered");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "laserutils-demo",
            "--step-increment",
            "0.5",
            "--pierce-targets",
            "--wall-at",
            "4",
            "--wall-at",
            "7",
        ]);
        let settings = args.settings().unwrap();
        assert!((settings.step_increment - 0.5).abs() < f64::EPSILON);
        assert!(settings.pierce_targets);
        assert!(!settings.pierce_blocks);
        assert_eq!(args.walls, vec![4, 7]);
    }

    #[test]
    fn invalid_flag_values_are_reported() {
        let args = Args::parse_from(["laserutils-demo", "--step-size=-1"]);
        assert!(matches!(args.settings(), Err(Error::InvalidStepSize(_))));
    }

    #[test]
    fn settings_file_uses_defaults_for_missing_fields() {
        let settings: RayCastSettings =
            toml::from_str("pierce_blocks = true\nstep_size = 0.25\n").unwrap();
        assert!(settings.pierce_blocks);
        assert!((settings.step_size - 0.25).abs() < f64::EPSILON);
        assert!((settings.step_increment - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        assert!(toml::from_str::<RayCastSettings>("step = 1.0").is_err());
    }

    #[test]
    fn scene_places_requested_targets() {
        let scene = Scene::build(&[4], &[6.0, 9.0]);
        assert_eq!(scene.targets.len(), 2);
        let mut caster = RayCaster::builder(&scene.level, scene.eye, EntityClass::Living)
            .pierce_blocks()
            .build(laserutils_raycast::NoEffects::new());
        caster.fire_in_direction(DVec3::X, 24.0);
        assert_eq!(caster.hit_targets(), &scene.targets[..1]);
    }
}
