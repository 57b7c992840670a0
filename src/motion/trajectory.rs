//! Synchronized straight-line trajectory across all joints.

use crate::config::units::Degrees;
use crate::DOF;

use super::profile::{Kinematics, TrapezoidalProfile};

/// Plan for one active movement, replaced wholesale whenever the movement
/// is (re)started.
///
/// Every axis follows `start + (target - start) / distance · s(t)` where
/// `s(t)` is the scalar trapezoid of the dominant axis, so all joints start
/// and stop together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrajectoryState {
    /// Joint angles when the plan was made.
    pub start: [Degrees; DOF],
    /// Commanded joint angles.
    pub target: [Degrees; DOF],
    /// Scalar velocity profile.
    pub profile: TrapezoidalProfile,
    /// Clock reading when the plan was made (µs).
    pub start_us: u64,
}

impl TrajectoryState {
    /// Plan a movement from `start` to `target`.
    pub fn plan(
        start: [Degrees; DOF],
        target: [Degrees; DOF],
        kinematics: &Kinematics,
        start_us: u64,
    ) -> Self {
        let distance = largest_degree_change(&start, &target);
        Self {
            start,
            target,
            profile: TrapezoidalProfile::plan(distance, kinematics),
            start_us,
        }
    }

    /// Path length of the dominant axis.
    #[inline]
    pub fn largest_degree_change(&self) -> f64 {
        self.profile.distance
    }

    /// Nothing to move; the command completes immediately.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.profile.is_zero()
    }

    /// Microseconds since the plan started.
    #[inline]
    pub fn elapsed_us(&self, now_us: u64) -> f64 {
        now_us.saturating_sub(self.start_us) as f64
    }

    /// Whether the profile has run out at `now_us`.
    #[inline]
    pub fn is_finished(&self, now_us: u64) -> bool {
        self.is_degenerate() || self.elapsed_us(now_us) > self.profile.t_finish
    }

    /// Interpolated joint angles at `now_us`.
    pub fn setpoints(&self, now_us: u64) -> [Degrees; DOF] {
        if self.is_degenerate() {
            return self.target;
        }

        let scaler = self.profile.distance_at(self.elapsed_us(now_us));
        let distance = self.profile.distance;
        let mut out = self.start;
        for (i, angle) in out.iter_mut().enumerate() {
            let span = self.target[i].0 - self.start[i].0;
            *angle = Degrees(self.start[i].0 + span / distance * scaler);
        }
        out
    }
}

/// Largest absolute per-axis change between two joint vectors.
pub fn largest_degree_change(start: &[Degrees; DOF], target: &[Degrees; DOF]) -> f64 {
    start
        .iter()
        .zip(target.iter())
        .map(|(s, t)| s.distance_to(*t))
        .fold(0.0, f64::max)
}
