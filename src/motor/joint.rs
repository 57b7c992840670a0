//! The axis surface the scheduler drives.

use crate::config::units::Degrees;
use crate::error::Result;
use crate::motion::Direction;

/// Operations the event scheduler needs from one joint.
///
/// [`Axis`](super::Axis) is the hardware implementation; the scheduler only
/// sees this trait, so it can be exercised without pins.
pub trait Joint {
    /// Logical position in degrees.
    fn position_degrees(&self) -> Degrees;

    /// Largest reachable angle, if the joint is bounded.
    fn max_degrees(&self) -> Option<Degrees>;

    /// Drive the direction signal.
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    /// Step until the logical position is within one step of `target`.
    ///
    /// Returns the number of steps emitted.
    fn catch_up_to(&mut self, target: Degrees) -> Result<u32>;

    /// `false` when the encoder disagrees with the step counter beyond the
    /// crash threshold.
    fn check_against_encoder(&self) -> bool;

    /// Overwrite the logical position with the encoder reading.
    ///
    /// Returns `false` if the reading lies past the bound and was rejected.
    fn resync_from_encoder(&mut self) -> bool;

    /// Encoder position and logical position, in steps, for diagnostics.
    fn encoder_and_motor_steps(&self) -> (i64, i64);
}
