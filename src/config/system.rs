//! Arm configuration - root configuration structure.

use heapless::Vec;
use serde::Deserialize;

use super::axis::AxisConfig;
use super::units::{Degrees, DegreesPerMicrosecond, DegreesPerMicrosecondSquared};
use crate::DOF;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ArmConfig {
    /// Per-joint configuration, base first.
    pub axes: Vec<AxisConfig, DOF>,

    /// Global peak velocity ceiling for queued movements.
    #[serde(default = "default_max_velocity")]
    pub max_velocity: DegreesPerMicrosecond,

    /// Lowest peak velocity crash recovery will halve down to.
    #[serde(default = "default_recovery_floor")]
    pub recovery_velocity_floor: DegreesPerMicrosecond,

    /// Homing move parameters.
    #[serde(default)]
    pub homing: HomingConfig,
}

/// Reference move used to drive every joint onto its limit switch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingConfig {
    /// Target angles, past the limit switches.
    #[serde(default = "default_homing_angles")]
    pub angles: [f64; DOF],

    /// Peak velocity at scale 1.0.
    #[serde(default = "default_homing_velocity")]
    pub velocity: DegreesPerMicrosecond,

    /// Acceleration at scale 1.0.
    #[serde(default = "default_homing_acceleration")]
    pub acceleration: DegreesPerMicrosecondSquared,
}

fn default_max_velocity() -> DegreesPerMicrosecond {
    DegreesPerMicrosecond(1e-2)
}

fn default_recovery_floor() -> DegreesPerMicrosecond {
    DegreesPerMicrosecond(1e-5)
}

fn default_homing_angles() -> [f64; DOF] {
    [-345.0, -200.0, -280.0, -280.0, -180.0, -360.0]
}

fn default_homing_velocity() -> DegreesPerMicrosecond {
    DegreesPerMicrosecond(0.04e-3)
}

fn default_homing_acceleration() -> DegreesPerMicrosecondSquared {
    DegreesPerMicrosecondSquared(0.03e-9)
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            angles: default_homing_angles(),
            velocity: default_homing_velocity(),
            acceleration: default_homing_acceleration(),
        }
    }
}

impl HomingConfig {
    /// Homing target as joint angles.
    pub fn targets(&self) -> [Degrees; DOF] {
        self.angles.map(Degrees)
    }
}

/// Scheduler-wide motion limits, split out of [`ArmConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionLimits {
    /// Global peak velocity ceiling.
    pub max_velocity: DegreesPerMicrosecond,
    /// Crash recovery floor.
    pub recovery_velocity_floor: DegreesPerMicrosecond,
    /// Homing move parameters.
    pub homing: HomingConfig,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_velocity: default_max_velocity(),
            recovery_velocity_floor: default_recovery_floor(),
            homing: HomingConfig::default(),
        }
    }
}

impl ArmConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes.iter().find(|a| a.name.as_str() == name)
    }

    /// List all axis names in joint order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|a| a.name.as_str())
    }

    /// Scheduler-wide limits.
    pub fn motion_limits(&self) -> MotionLimits {
        MotionLimits {
            max_velocity: self.max_velocity,
            recovery_velocity_floor: self.recovery_velocity_floor,
            homing: self.homing,
        }
    }
}
