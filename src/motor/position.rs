//! Position tracking for stepper motors.
//!
//! Provides absolute position tracking in steps with unit conversions.
//! Travel bounds live in [`MechanicalConstraints`](crate::config::MechanicalConstraints)
//! and are enforced by the axis before the counter moves.

use crate::config::units::{Degrees, Steps};

/// Motor position tracker.
///
/// Maintains absolute position in steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Current position in steps (from origin)
    steps: Steps,
    /// Joint angle covered by one step
    degrees_per_step: f64,
}

impl Position {
    /// Create a new position tracker at the origin.
    #[inline]
    pub fn new(degrees_per_step: f64) -> Self {
        Self {
            steps: Steps::default(),
            degrees_per_step,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get current position in degrees.
    #[inline]
    pub fn degrees(&self) -> Degrees {
        self.steps.to_degrees(self.degrees_per_step)
    }

    /// Set position in steps.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Move by a number of steps.
    #[inline]
    pub fn move_steps(&mut self, delta: i64) {
        self.steps = Steps(self.steps.0 + delta);
    }

    /// Signed angle from the current position to a target.
    #[inline]
    pub fn degrees_to(&self, target: Degrees) -> f64 {
        target.0 - self.degrees().0
    }
}
