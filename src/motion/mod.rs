//! Motion module for arm-motion.
//!
//! Provides trapezoidal profile planning and multi-axis interpolation.

mod profile;
mod trajectory;

pub use profile::{Direction, Kinematics, MotionPhase, TrapezoidalProfile};
pub use trajectory::{largest_degree_change, TrajectoryState};
