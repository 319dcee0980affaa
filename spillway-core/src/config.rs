//! Per-splitter configuration.

use serde::{Deserialize, Serialize};
use spillway_utils::{DEFAULT_ANGLE_STEP, MIN_ANGLE_STEP};
use thiserror::Error;

/// Static settings of one [`Splitter`](crate::Splitter).
///
/// Every field has a default, so a config file only needs to list overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Opening radius in container-local units, scaled by the container's scale factor.
    pub opening_radius: f32,
    /// How fast liquid leaves the container, in fill fraction per unit radius per second.
    pub split_speed: f32,
    /// Number of surfaces the liquid may run off before it is considered absorbed.
    pub max_hops: u32,
    /// Capacity of the hit buffer shared by all probes of one splitter.
    ///
    /// Hits past this bound are dropped. Increase it if receivers or obstacles
    /// are missed in crowded scenes.
    pub probe_buffer_capacity: usize,
    /// Radius of the downward sphere probe.
    pub probe_radius: f32,
    /// Extra reach around a receiving opening, multiplied by the flow scale.
    pub splash_tolerance: f32,
    /// Angular step, in radians, of the lowest rim point search.
    ///
    /// Must be at least [`MIN_ANGLE_STEP`].
    pub angle_step: f32,
    /// How far below a surface the edge probe starts.
    pub edge_probe_drop: f32,
    /// Distance within which a spill point still counts as inside the liquid
    /// bounds, scaled by the container's largest axis scale.
    pub liquid_bounds_tolerance: f32,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            opening_radius: 0.1,
            split_speed: 2.0,
            max_hops: 4,
            probe_buffer_capacity: 10,
            probe_radius: 0.025,
            splash_tolerance: 0.025,
            angle_step: DEFAULT_ANGLE_STEP,
            edge_probe_drop: 0.0001,
            liquid_bounds_tolerance: 0.01,
        }
    }
}

/// A rejected [`SplitterConfig`] value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A field that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A field that must not be negative was.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The rim search step is so fine a tick would take millions of samples.
    #[error("angle_step must be at least {min}, got {value}")]
    AngleStepTooSmall {
        /// Smallest accepted step.
        min: f32,
        /// Offending value.
        value: f32,
    },
    /// The probe buffer cannot hold a single hit.
    #[error("probe_buffer_capacity must be at least 1")]
    EmptyProbeBuffer,
}

impl SplitterConfig {
    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("opening_radius", self.opening_radius),
            ("split_speed", self.split_speed),
            ("probe_radius", self.probe_radius),
            ("angle_step", self.angle_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("splash_tolerance", self.splash_tolerance),
            ("edge_probe_drop", self.edge_probe_drop),
            ("liquid_bounds_tolerance", self.liquid_bounds_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.angle_step < MIN_ANGLE_STEP {
            return Err(ConfigError::AngleStepTooSmall {
                min: MIN_ANGLE_STEP,
                value: self.angle_step,
            });
        }
        if self.probe_buffer_capacity == 0 {
            return Err(ConfigError::EmptyProbeBuffer);
        }
        Ok(())
    }
}
