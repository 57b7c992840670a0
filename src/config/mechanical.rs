//! Mechanical constraints derived from axis configuration.

use super::axis::AxisConfig;
use super::units::{Degrees, Steps};
use crate::error::MotorError;

/// Derived mechanical parameters computed from axis configuration.
///
/// These are computed once at initialization and used for all motion planning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechanicalConstraints {
    /// Steps per joint revolution (microsteps × gear reduction).
    pub steps_per_revolution: f64,

    /// Joint angle covered by one step.
    pub degrees_per_step: f64,

    /// Motor steps represented by one encoder count (microsteps / CPR).
    pub steps_per_encoder_count: f64,

    /// Maximum position past home (if bounded).
    pub max_position: Option<Steps>,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            steps_per_revolution: config.steps_per_revolution(),
            degrees_per_step: config.degrees_per_step(),
            steps_per_encoder_count: config.microsteps.value() as f64 / config.encoder_cpr,
            max_position: config.max_position_steps.map(Steps),
        }
    }

    /// Convert degrees to the nearest step.
    #[inline]
    pub fn degrees_to_steps(&self, degrees: Degrees) -> Steps {
        Steps::from_degrees(degrees, self.degrees_per_step)
    }

    /// Convert steps to degrees.
    #[inline]
    pub fn steps_to_degrees(&self, steps: Steps) -> Degrees {
        steps.to_degrees(self.degrees_per_step)
    }

    /// Convert a raw encoder count to motor steps.
    ///
    /// Truncates toward zero, matching how the count is compared against
    /// the step counter.
    #[inline]
    pub fn encoder_counts_to_steps(&self, counts: i64) -> Steps {
        Steps((counts as f64 * self.steps_per_encoder_count) as i64)
    }

    /// Largest reachable angle, if the axis is bounded.
    #[inline]
    pub fn max_degrees(&self) -> Option<Degrees> {
        self.max_position.map(|s| self.steps_to_degrees(s))
    }

    /// Check a step position against the bound.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::LimitExceeded` if `steps` is past the bound.
    #[inline]
    pub fn check_bound(&self, steps: Steps) -> Result<(), MotorError> {
        match self.max_position {
            Some(max) if steps > max => Err(MotorError::LimitExceeded {
                position: steps.0,
                limit: max.0,
            }),
            _ => Ok(()),
        }
    }
}
