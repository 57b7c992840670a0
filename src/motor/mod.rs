//! Motor module for arm-motion.
//!
//! Provides the per-joint stepper driver with limit switch filtering,
//! encoder crash detection, and position tracking.

mod axis;
mod builder;
mod joint;
mod position;

pub use axis::Axis;
pub use builder::AxisBuilder;
pub use joint::Joint;
pub use position::Position;
