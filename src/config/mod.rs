//! Configuration module for arm-motion.
//!
//! Provides the static per-joint configuration the axis set is built from,
//! loaded from TOML files (with `std` feature) or constructed in code.

mod axis;
mod limit_switch;
#[cfg(feature = "std")]
mod loader;
mod mechanical;
mod system;
pub mod units;
mod validation;

pub use axis::AxisConfig;
pub use limit_switch::LimitSwitchConfig;
pub use mechanical::MechanicalConstraints;
pub use system::{ArmConfig, HomingConfig, MotionLimits};
pub use validation::{validate_axis, validate_config};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, DegreesPerMicrosecond, DegreesPerMicrosecondSquared, Microsteps, Steps};
