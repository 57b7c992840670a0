//! Trapezoidal velocity profile over a scalar path coordinate.
//!
//! The profile is planned for the dominant axis only; every other axis is
//! scaled against it (see [`super::TrajectoryState`]). All quantities are in
//! degrees and microseconds.

use libm::sqrt;

use crate::config::units::{DegreesPerMicrosecond, DegreesPerMicrosecondSquared};

/// Direction of joint motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// Get direction from a signed angular delta.
    #[inline]
    pub fn from_delta(delta: f64) -> Self {
        if delta < 0.0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Phase of the profile at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating toward peak velocity.
    Accelerating,
    /// Moving at constant peak velocity.
    Cruising,
    /// Decelerating toward the final velocity.
    Decelerating,
    /// Past the end of the profile.
    Complete,
}

/// Kinematic request attached to a movement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Kinematics {
    /// Requested peak velocity.
    pub peak_velocity: DegreesPerMicrosecond,
    /// Acceleration and deceleration rate.
    pub acceleration: DegreesPerMicrosecondSquared,
    /// Velocity at the start of the move.
    pub initial_velocity: DegreesPerMicrosecond,
    /// Velocity at the end of the move.
    pub final_velocity: DegreesPerMicrosecond,
}

impl Kinematics {
    /// Start and end at rest.
    pub fn from_rest(
        peak_velocity: DegreesPerMicrosecond,
        acceleration: DegreesPerMicrosecondSquared,
    ) -> Self {
        Self {
            peak_velocity,
            acceleration,
            initial_velocity: DegreesPerMicrosecond(0.0),
            final_velocity: DegreesPerMicrosecond(0.0),
        }
    }
}

/// Closed-form trapezoid for a path of `distance` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapezoidalProfile {
    /// Path length (largest per-axis degree change).
    pub distance: f64,
    /// Peak velocity after feasibility clamping.
    pub peak_velocity: f64,
    /// Acceleration and deceleration rate.
    pub acceleration: f64,
    /// Initial velocity.
    pub initial_velocity: f64,
    /// Final velocity.
    pub final_velocity: f64,
    /// End of the acceleration phase (µs).
    pub t_accel_end: f64,
    /// End of the cruise phase (µs).
    pub t_cruise_end: f64,
    /// End of the profile (µs).
    pub t_finish: f64,
    /// Distance covered by the end of acceleration.
    pub lap_distance: f64,
    /// Distance covered by the start of deceleration.
    pub lcsp_distance: f64,
}

impl TrapezoidalProfile {
    /// Plan a profile covering `distance` degrees.
    ///
    /// The requested peak velocity is clamped to
    /// `sqrt(d·a + vi²/2 + vf²/2)`, the highest velocity reachable with
    /// the remaining distance still able to decelerate, so the cruise phase
    /// never has negative length. Returns a zero profile for degenerate
    /// requests (no distance, no acceleration, no velocity, or non-finite
    /// results).
    pub fn plan(distance: f64, kinematics: &Kinematics) -> Self {
        let accel = kinematics.acceleration.0;
        let v_init = kinematics.initial_velocity.0;
        let v_final = kinematics.final_velocity.0;

        if !(distance > 0.0) || !(accel > 0.0) || !(kinematics.peak_velocity.0 > 0.0) {
            return Self::zero();
        }

        let feasible = sqrt(distance * accel + 0.5 * v_init * v_init + 0.5 * v_final * v_final);
        let peak = kinematics.peak_velocity.0.min(feasible);

        let t_accel_end = peak / accel - v_init / accel;
        let lap_distance = v_init * t_accel_end + accel * t_accel_end * t_accel_end / 2.0;
        let lcsp_distance =
            distance - (peak * peak / 2.0 / accel - v_final * v_final / 2.0 / accel);
        let t_cruise_end = (lcsp_distance - lap_distance) / peak + t_accel_end;
        let t_finish = peak / accel - v_final / accel + t_cruise_end;

        if !t_finish.is_finite() {
            return Self::zero();
        }

        Self {
            distance,
            peak_velocity: peak,
            acceleration: accel,
            initial_velocity: v_init,
            final_velocity: v_final,
            t_accel_end,
            t_cruise_end,
            t_finish,
            lap_distance,
            lcsp_distance,
        }
    }

    /// Create a zero-length profile (already at target).
    pub fn zero() -> Self {
        Self {
            distance: 0.0,
            peak_velocity: 0.0,
            acceleration: 0.0,
            initial_velocity: 0.0,
            final_velocity: 0.0,
            t_accel_end: 0.0,
            t_cruise_end: 0.0,
            t_finish: 0.0,
            lap_distance: 0.0,
            lcsp_distance: 0.0,
        }
    }

    /// Check if this is a zero-length profile.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.distance == 0.0
    }

    /// Get the phase at an elapsed time.
    pub fn phase_at(&self, elapsed_us: f64) -> MotionPhase {
        if self.is_zero() || elapsed_us > self.t_finish {
            MotionPhase::Complete
        } else if elapsed_us <= self.t_accel_end {
            MotionPhase::Accelerating
        } else if elapsed_us <= self.t_cruise_end {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Distance along the path at an elapsed time.
    ///
    /// Times past `t_finish` evaluate at `t_finish`, which lands on
    /// `distance`.
    pub fn distance_at(&self, elapsed_us: f64) -> f64 {
        if self.is_zero() {
            return 0.0;
        }

        let dt = elapsed_us.min(self.t_finish).max(0.0);
        let a = self.acceleration;
        let v = self.peak_velocity;

        if dt <= self.t_accel_end {
            self.initial_velocity * dt + a * dt * dt / 2.0
        } else if dt <= self.t_cruise_end {
            self.lap_distance + v * (dt - self.t_accel_end)
        } else {
            let t = dt - self.t_cruise_end;
            self.lcsp_distance + v * t - a * t * t / 2.0
        }
    }

    /// Total duration in microseconds.
    #[inline]
    pub fn duration_us(&self) -> f64 {
        self.t_finish
    }
}
