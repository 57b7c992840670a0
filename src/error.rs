//! Error types for arm-motion.
//!
//! Provides unified error handling across configuration, axis control, and
//! command queueing, plus the numeric error register exposed to collaborators.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all arm-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Axis operation error
    Motor(MotorError),
    /// Command validation or queueing error
    Queue(QueueError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be > 0)
    InvalidMicrosteps(u32),
    /// Invalid gear reduction (must be > 0)
    InvalidGearReduction(f64),
    /// Invalid encoder counts per revolution (must be > 0)
    InvalidEncoderCpr(f64),
    /// Invalid limit switch filter settings
    InvalidLimitFilter {
        /// Number of samples per read
        samples: u8,
        /// Active-fraction threshold
        threshold: f64,
    },
    /// Wrong number of configured axes
    AxisCount {
        /// Axes found in configuration
        found: usize,
        /// Axes required
        expected: usize,
    },
    /// No configured axis at this index
    AxisIndex {
        /// Requested axis index (0-based)
        index: usize,
        /// Axes configured
        count: usize,
    },
    /// Invalid global velocity ceiling (must be > 0)
    InvalidMaxVelocity(f64),
    /// Invalid crash recovery velocity floor (must be > 0 and below the ceiling)
    InvalidRecoveryFloor(f64),
    /// Builder is missing a required part
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Axis operation errors.
///
/// Everything except `PinError` is a refused step: no pulse was emitted and
/// the logical position is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Axis is disabled
    Disabled,
    /// Limit switch is active while moving counter-clockwise
    LimitSwitchActive,
    /// Position would exceed the axis bound
    LimitExceeded {
        /// Requested position in steps
        position: i64,
        /// Bound that was exceeded
        limit: i64,
    },
}

/// Command validation and queueing errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueError {
    /// A target angle lies outside the axis travel
    OutsideMotorBounds {
        /// Axis index (0-based)
        axis: usize,
        /// Requested target in degrees
        target: f64,
        /// Maximum reachable angle in degrees
        max: f64,
    },
    /// Requested peak velocity exceeds the global ceiling
    VelocityTooHigh {
        /// Requested velocity in degrees per microsecond
        requested: f64,
        /// Ceiling in degrees per microsecond
        max: f64,
    },
    /// Command queue is at capacity
    QueueFull,
    /// Acceleration or a velocity is negative or not finite
    InvalidKinematics {
        /// Offending parameter
        field: &'static str,
        /// Rejected value
        value: f64,
    },
}

/// Numeric error register value, as read by external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ErrorCode {
    /// No error latched
    #[default]
    Ok = 0,
    /// Target outside an axis bound
    OutsideMotorBounds = 1,
    /// Peak velocity above the ceiling
    VelocityTooHigh = 2,
    /// Queue at capacity
    QueueFull = 3,
    /// Negative or non-finite acceleration or velocity
    InvalidKinematics = 4,
}

impl ErrorCode {
    /// Raw register value.
    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl From<&QueueError> for ErrorCode {
    fn from(e: &QueueError) -> Self {
        match e {
            QueueError::OutsideMotorBounds { .. } => ErrorCode::OutsideMotorBounds,
            QueueError::VelocityTooHigh { .. } => ErrorCode::VelocityTooHigh,
            QueueError::QueueFull => ErrorCode::QueueFull,
            QueueError::InvalidKinematics { .. } => ErrorCode::InvalidKinematics,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Queue(e) => write!(f, "Queue error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => write!(f, "Invalid microsteps: {}. Must be > 0", v),
            ConfigError::InvalidGearReduction(v) => {
                write!(f, "Invalid gear reduction: {}. Must be > 0", v)
            }
            ConfigError::InvalidEncoderCpr(v) => write!(f, "Invalid encoder CPR: {}. Must be > 0", v),
            ConfigError::InvalidLimitFilter { samples, threshold } => write!(
                f,
                "Invalid limit switch filter: {} samples, threshold {}. Need samples > 0 and 0 <= threshold < 1",
                samples, threshold
            ),
            ConfigError::AxisCount { found, expected } => {
                write!(f, "Expected {} axes, found {}", expected, found)
            }
            ConfigError::AxisIndex { index, count } => {
                write!(f, "No axis at index {} ({} configured)", index, count)
            }
            ConfigError::InvalidMaxVelocity(v) => write!(f, "Invalid max velocity: {}. Must be > 0", v),
            ConfigError::InvalidRecoveryFloor(v) => write!(
                f,
                "Invalid recovery velocity floor: {}. Must be > 0 and below max velocity",
                v
            ),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::Disabled => write!(f, "Axis is disabled"),
            MotorError::LimitSwitchActive => write!(f, "Limit switch active"),
            MotorError::LimitExceeded { position, limit } => {
                write!(f, "Position {} exceeds limit {}", position, limit)
            }
        }
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::OutsideMotorBounds { axis, target, max } => write!(
                f,
                "Axis {} target {} outside of motor bounds [0, {}]",
                axis + 1,
                target,
                max
            ),
            QueueError::VelocityTooHigh { requested, max } => {
                write!(f, "Requested velocity {} exceeds maximum {}", requested, max)
            }
            QueueError::QueueFull => write!(f, "Command queue is full"),
            QueueError::InvalidKinematics { field, value } => {
                write!(f, "Invalid {}: {}", field, value)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        Error::Queue(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for QueueError {}
