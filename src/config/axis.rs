//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::limit_switch::LimitSwitchConfig;
use super::units::Microsteps;

/// Complete configuration of one joint: drive train, bounds, and feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Controller-issued steps per motor revolution.
    pub microsteps: Microsteps,

    /// Gear reduction between motor shaft and joint (1.0 for direct drive).
    #[serde(default = "default_gear_reduction")]
    pub gear_reduction: f64,

    /// Maximum position past home in steps (`None` = unbounded).
    #[serde(default)]
    pub max_position_steps: Option<i64>,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Compare commanded position against the encoder while moving.
    #[serde(default = "default_crash_detection")]
    pub crash_detection: bool,

    /// Allowed difference between motor and encoder position, in steps.
    #[serde(default = "default_encoder_threshold")]
    pub encoder_threshold_steps: i64,

    /// Encoder counts per motor revolution.
    #[serde(default = "default_encoder_cpr")]
    pub encoder_cpr: f64,

    /// STEP pulse high time in microseconds.
    #[serde(default = "default_pulse_width")]
    pub pulse_width_us: u32,

    /// Limit switch debounce filter.
    #[serde(default)]
    pub limit_switch: LimitSwitchConfig,
}

fn default_gear_reduction() -> f64 {
    1.0
}

fn default_crash_detection() -> bool {
    true
}

fn default_encoder_threshold() -> i64 {
    300
}

fn default_encoder_cpr() -> f64 {
    4000.0
}

fn default_pulse_width() -> u32 {
    3
}

impl AxisConfig {
    /// Create a configuration with defaults for everything but the drive train.
    pub fn new(name: &str, microsteps: Microsteps, gear_reduction: f64) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            microsteps,
            gear_reduction,
            max_position_steps: None,
            invert_direction: false,
            crash_detection: default_crash_detection(),
            encoder_threshold_steps: default_encoder_threshold(),
            encoder_cpr: default_encoder_cpr(),
            pulse_width_us: default_pulse_width(),
            limit_switch: LimitSwitchConfig::default(),
        }
    }

    /// Steps per joint revolution (microsteps × gear reduction).
    pub fn steps_per_revolution(&self) -> f64 {
        self.microsteps.value() as f64 * self.gear_reduction
    }

    /// Joint angle covered by a single step.
    pub fn degrees_per_step(&self) -> f64 {
        360.0 / self.steps_per_revolution()
    }
}
