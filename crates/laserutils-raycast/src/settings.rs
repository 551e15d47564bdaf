//! Plain-data ray cast settings.

use laserutils_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Numeric and flag settings of a ray cast.
///
/// Missing fields deserialize to their defaults, so a settings file only
/// needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RayCastSettings {
    /// Distance between consecutive samples along the ray. Must be > 0.
    pub step_increment: f64,
    /// Half-width of the target sampling box around each sample. Must be >= 0.
    pub step_size: f64,
    /// Keep going through solid voxels.
    pub pierce_blocks: bool,
    /// Keep going after hitting a target.
    pub pierce_targets: bool,
    /// Keep target hits from previous fires.
    pub persist_target_hits: bool,
    /// Keep voxel hits from previous fires.
    pub persist_voxel_hits: bool,
}

impl Default for RayCastSettings {
    fn default() -> Self {
        Self {
            step_increment: 0.3,
            step_size: 0.0,
            pierce_blocks: false,
            pierce_targets: false,
            persist_target_hits: false,
            persist_voxel_hits: false,
        }
    }
}

impl RayCastSettings {
    /// Check a step increment without applying it.
    pub fn check_step_increment(step_increment: f64) -> Result<f64> {
        // NaN fails the comparison and is rejected too
        if step_increment > 0.0 && step_increment.is_finite() {
            Ok(step_increment)
        } else {
            Err(Error::InvalidStepIncrement(step_increment))
        }
    }

    /// Check a step size without applying it.
    pub fn check_step_size(step_size: f64) -> Result<f64> {
        if step_size >= 0.0 && step_size.is_finite() {
            Ok(step_size)
        } else {
            Err(Error::InvalidStepSize(step_size))
        }
    }

    /// Validate every numeric field.
    pub fn validate(&self) -> Result<()> {
        Self::check_step_increment(self.step_increment)?;
        Self::check_step_size(self.step_size)?;
        Ok(())
    }
}
