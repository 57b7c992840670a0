//! # arm-motion
//!
//! Motion core for a six-axis stepper robotic arm, built on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Event queue**: Movement, sleep, and homing commands run one at a time
//! - **Trapezoidal profiles**: All joints start and stop together
//! - **Crash recovery**: Encoder mismatches slow the move down instead of failing it
//! - **Limit switch filtering**: Majority-vote debounce against motor noise
//! - **Configuration-driven**: Axis mechanics and limits from TOML files
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arm_motion::{AxisBuilder, Controller, StdClock};
//!
//! let config = arm_motion::load_config("arm.toml")?;
//!
//! let base = AxisBuilder::new()
//!     .from_config(&config, 0)?
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .limit_pin(limit_pin)
//!     .encoder(encoder)
//!     .delay(delay)
//!     .build()?;
//! // ... five more axes
//!
//! let mut arm = Controller::from_config(&config, [base, shoulder, elbow, wrist1, wrist2, wrist3], StdClock::new())?;
//! arm.enqueue_packed(&[90.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e-3, 1e-9, 0.0, 0.0, 0.0])?;
//! arm.run_until_idle()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing, and `StdClock`
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(all(not(feature = "std"), test))]
#[macro_use]
extern crate std;

/// Number of joints on the arm.
pub const DOF: usize = 6;

// Core modules
pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod motion;
pub mod motor;
pub mod scheduler;

// Re-exports for ergonomic API
pub use config::{validate_config, ArmConfig, AxisConfig, MotionLimits};
pub use controller::Controller;
pub use error::{Error, ErrorCode, Result};
pub use hal::{MonotonicClock, QuadratureEncoder};
pub use motion::{Direction, Kinematics, MotionPhase, TrajectoryState, TrapezoidalProfile};
pub use motor::{Axis, AxisBuilder, Joint};
pub use scheduler::{Command, CommandState, EventScheduler, MovementBuilder};

#[cfg(feature = "std")]
pub use hal::StdClock;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{
    Degrees, DegreesPerMicrosecond, DegreesPerMicrosecondSquared, Microsteps, Steps,
};
