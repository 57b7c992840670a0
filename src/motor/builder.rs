//! Builder pattern for Axis.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::Microsteps;
use crate::config::{ArmConfig, AxisConfig, MechanicalConstraints};
use crate::error::{ConfigError, Error, Result};
use crate::hal::QuadratureEncoder;

use super::axis::{Axis, AxisSettings};

/// Builder for creating Axis instances.
pub struct AxisBuilder<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    limit_pin: Option<LIMIT>,
    encoder: Option<ENC>,
    delay: Option<DELAY>,
    config: Option<AxisConfig>,
    crash_detection: Option<bool>,
}

impl<STEP, DIR, LIMIT, ENC, DELAY> Default for AxisBuilder<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, LIMIT, ENC, DELAY> AxisBuilder<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            limit_pin: None,
            encoder: None,
            delay: None,
            config: None,
            crash_detection: None,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the limit switch input.
    pub fn limit_pin(mut self, pin: LIMIT) -> Self {
        self.limit_pin = Some(pin);
        self
    }

    /// Set the encoder.
    pub fn encoder(mut self, encoder: ENC) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Configure from scratch with default switch and encoder settings.
    pub fn mechanics(mut self, name: &str, microsteps: Microsteps, gear_reduction: f64) -> Self {
        self.config = Some(AxisConfig::new(name, microsteps, gear_reduction));
        self
    }

    /// Override encoder crash detection for this axis.
    pub fn crash_detection(mut self, enabled: bool) -> Self {
        self.crash_detection = Some(enabled);
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Configure from ArmConfig by joint index.
    pub fn from_config(self, config: &ArmConfig, index: usize) -> Result<Self> {
        let axis_config = config.axes.get(index).ok_or(Error::Config(ConfigError::AxisIndex {
            index,
            count: config.axes.len(),
        }))?;

        Ok(self.from_axis_config(axis_config))
    }

    /// Build the Axis.
    ///
    /// # Errors
    ///
    /// Returns an error if a required part is missing or the direction pin
    /// cannot be driven.
    pub fn build(self) -> Result<Axis<STEP, DIR, LIMIT, ENC, DELAY>> {
        let step_pin = self.step_pin.ok_or(ConfigError::MissingField("step_pin"))?;
        let dir_pin = self.dir_pin.ok_or(ConfigError::MissingField("dir_pin"))?;
        let limit_pin = self.limit_pin.ok_or(ConfigError::MissingField("limit_pin"))?;
        let encoder = self.encoder.ok_or(ConfigError::MissingField("encoder"))?;
        let delay = self.delay.ok_or(ConfigError::MissingField("delay"))?;
        let config = self.config.ok_or(ConfigError::MissingField("axis configuration"))?;

        crate::config::validate_axis(&config)?;

        let settings = AxisSettings {
            constraints: MechanicalConstraints::from_config(&config),
            name: config.name.clone(),
            invert_direction: config.invert_direction,
            crash_detection: self.crash_detection.unwrap_or(config.crash_detection),
            encoder_threshold: config.encoder_threshold_steps,
            limit_switch: config.limit_switch,
            pulse_width_us: config.pulse_width_us,
        };

        Axis::new(step_pin, dir_pin, limit_pin, encoder, delay, settings)
    }
}
