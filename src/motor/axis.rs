//! One joint: stepper driver, limit switch, and encoder feedback.
//!
//! Generic over embedded-hal 1.0 pin types. The axis owns no kinematics;
//! it only knows how to step toward an angle and how far its step counter
//! may drift from the encoder.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::{Degrees, Steps};
use crate::config::{LimitSwitchConfig, MechanicalConstraints};
use crate::error::{MotorError, Result};
use crate::hal::QuadratureEncoder;
use crate::motion::Direction;

use super::joint::Joint;
use super::position::Position;

/// A single stepper-driven joint with closed-loop position checking.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `LIMIT`: limit switch input (must implement `InputPin`)
/// - `ENC`: encoder counter (must implement `QuadratureEncoder`)
/// - `DELAY`: delay provider for pulse width and debounce spacing
pub struct Axis<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = CW, low = CCW, or inverted).
    dir_pin: DIR,

    /// Limit switch at the home end of travel.
    limit_pin: LIMIT,

    /// Encoder counting actual shaft motion.
    encoder: ENC,

    /// Delay provider for step timing and debounce spacing.
    delay: DELAY,

    /// Logical position, only changed by a pulse or an explicit set.
    position: Position,

    /// Direction the next pulse moves in.
    direction: Direction,

    /// Mechanical constraints from configuration.
    constraints: MechanicalConstraints,

    /// Axis name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Compare against the encoder while moving.
    crash_detection: bool,

    /// Allowed encoder drift in steps.
    encoder_threshold: i64,

    /// Limit switch debounce settings.
    limit_switch: LimitSwitchConfig,

    /// STEP high time in microseconds.
    pulse_width_us: u32,

    /// A disabled axis refuses every step.
    disabled: bool,
}

/// Settings copied into an [`Axis`] at construction.
pub(crate) struct AxisSettings {
    pub constraints: MechanicalConstraints,
    pub name: heapless::String<32>,
    pub invert_direction: bool,
    pub crash_detection: bool,
    pub encoder_threshold: i64,
    pub limit_switch: LimitSwitchConfig,
    pub pulse_width_us: u32,
}

impl<STEP, DIR, LIMIT, ENC, DELAY> Axis<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    /// Create an axis at position zero, driving the direction pin clockwise.
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        limit_pin: LIMIT,
        encoder: ENC,
        delay: DELAY,
        settings: AxisSettings,
    ) -> Result<Self> {
        let mut axis = Self {
            step_pin,
            dir_pin,
            limit_pin,
            encoder,
            delay,
            position: Position::new(settings.constraints.degrees_per_step),
            direction: Direction::Clockwise,
            constraints: settings.constraints,
            name: settings.name,
            invert_direction: settings.invert_direction,
            crash_detection: settings.crash_detection,
            encoder_threshold: settings.encoder_threshold,
            limit_switch: settings.limit_switch,
            pulse_width_us: settings.pulse_width_us,
            disabled: false,
        };
        axis.write_direction_pin(Direction::Clockwise)?;
        Ok(axis)
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// Get current position in degrees.
    #[inline]
    pub fn position_degrees(&self) -> Degrees {
        self.position.degrees()
    }

    /// Get the angle covered by one step.
    #[inline]
    pub fn degrees_per_step(&self) -> f64 {
        self.constraints.degrees_per_step
    }

    /// Get the upper position bound.
    #[inline]
    pub fn max_position(&self) -> Option<Steps> {
        self.constraints.max_position
    }

    /// Get the mechanical constraints.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.constraints
    }

    /// Get the current direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the axis refuses motion.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether encoder crash detection runs for this axis.
    #[inline]
    pub fn is_crash_detection_enabled(&self) -> bool {
        self.crash_detection
    }

    /// Get the encoder.
    #[inline]
    pub fn encoder(&self) -> &ENC {
        &self.encoder
    }

    /// Enable or disable the axis.
    ///
    /// Homing uses this to park a joint that reached its switch while the
    /// others keep moving.
    pub fn set_status(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Overwrite the logical position.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::LimitExceeded` and keeps the old position if
    /// `steps` is past the bound.
    pub fn set_current_position(&mut self, steps: Steps) -> core::result::Result<(), MotorError> {
        self.constraints.check_bound(steps)?;
        self.position.set_steps(steps);
        Ok(())
    }

    /// Set the direction of the next pulses and drive the DIR pin.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.direction == direction {
            return Ok(());
        }
        self.write_direction_pin(direction)?;
        self.direction = direction;
        Ok(())
    }

    fn write_direction_pin(&mut self, direction: Direction) -> Result<()> {
        let pin_high = match direction {
            Direction::Clockwise => !self.invert_direction,
            Direction::CounterClockwise => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }

    /// Emit exactly one step in the current direction.
    ///
    /// # Errors
    ///
    /// The step is refused, with no pulse and no position change, when the
    /// axis is disabled, when moving counter-clockwise onto an active limit
    /// switch, or when the new position would pass the bound.
    pub fn pulse(&mut self) -> core::result::Result<(), MotorError> {
        if self.disabled {
            return Err(MotorError::Disabled);
        }

        if self.direction == Direction::CounterClockwise
            && self.read_limit_switch_raw()?
            && self.filtered_limit(self.limit_switch.step_guard_threshold)?
        {
            return Err(MotorError::LimitSwitchActive);
        }

        let next = Steps(self.position.steps().0 + self.direction.sign());
        self.constraints.check_bound(next)?;

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.pulse_width_us);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        self.position.set_steps(next);
        Ok(())
    }

    /// Step toward `target` until within one step of it.
    ///
    /// Runs synchronously: the call takes time proportional to the number
    /// of steps needed. Stops early, without error, if a step is refused;
    /// the axis then stalls at its bound or switch while the others carry on.
    /// A non-finite target emits nothing.
    pub fn catch_up_to(&mut self, target: Degrees) -> Result<u32> {
        let mut emitted = 0u32;
        if !target.0.is_finite() {
            return Ok(emitted);
        }

        while !self.disabled {
            let gap = self.position.degrees_to(target);
            if libm::fabs(gap) <= self.constraints.degrees_per_step {
                break;
            }

            self.set_direction(Direction::from_delta(gap))?;
            match self.pulse() {
                Ok(()) => emitted += 1,
                Err(MotorError::PinError) => return Err(MotorError::PinError.into()),
                Err(_) => break,
            }
        }

        Ok(emitted)
    }

    /// Encoder position converted to motor steps.
    pub fn read_encoder_position(&self) -> Steps {
        self.constraints.encoder_counts_to_steps(self.encoder.count())
    }

    /// Zero the encoder, returning its previous position in motor steps.
    pub fn reset_encoder_position(&mut self) -> Steps {
        let counts = self.encoder.reset();
        self.constraints.encoder_counts_to_steps(counts)
    }

    /// `true` while the step counter agrees with the encoder.
    ///
    /// Always `true` when crash detection is disabled for this axis.
    pub fn check_against_encoder(&self) -> bool {
        if !self.crash_detection {
            return true;
        }
        let drift = self.read_encoder_position().0 - self.position.steps().0;
        drift.unsigned_abs() <= self.encoder_threshold.unsigned_abs()
    }

    /// Debounced limit switch state.
    pub fn read_limit_switch(&mut self) -> Result<bool> {
        Ok(self.filtered_limit(self.limit_switch.read_threshold)?)
    }

    /// Single unfiltered limit switch read.
    pub fn read_limit_switch_raw(&mut self) -> core::result::Result<bool, MotorError> {
        let high = self.limit_pin.is_high().map_err(|_| MotorError::PinError)?;
        Ok(high == self.limit_switch.active_high)
    }

    fn filtered_limit(&mut self, threshold: f64) -> core::result::Result<bool, MotorError> {
        let samples = self.limit_switch.samples;
        let mut active = 0u8;
        for i in 0..samples {
            if self.read_limit_switch_raw()? {
                active += 1;
            }
            if i + 1 < samples && self.limit_switch.sample_delay_us > 0 {
                self.delay.delay_us(self.limit_switch.sample_delay_us);
            }
        }
        Ok(self.limit_switch.is_active(active, threshold))
    }
}

impl<STEP, DIR, LIMIT, ENC, DELAY> Joint for Axis<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    fn position_degrees(&self) -> Degrees {
        Axis::position_degrees(self)
    }

    fn max_degrees(&self) -> Option<Degrees> {
        self.constraints.max_degrees()
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        Axis::set_direction(self, direction)
    }

    fn catch_up_to(&mut self, target: Degrees) -> Result<u32> {
        Axis::catch_up_to(self, target)
    }

    fn check_against_encoder(&self) -> bool {
        Axis::check_against_encoder(self)
    }

    fn resync_from_encoder(&mut self) -> bool {
        let steps = self.read_encoder_position();
        self.set_current_position(steps).is_ok()
    }

    fn encoder_and_motor_steps(&self) -> (i64, i64) {
        (self.read_encoder_position().0, self.position.steps().0)
    }
}

impl<STEP, DIR, LIMIT, ENC, DELAY> fmt::Display for Axis<STEP, DIR, LIMIT, ENC, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
        };
        write!(
            f,
            "{}: {} steps ({:.5} deg), encoder {} steps, {}{}",
            self.name,
            self.position.steps().0,
            self.position.degrees().0,
            self.read_encoder_position().0,
            direction,
            if self.disabled { ", disabled" } else { "" }
        )
    }
}
