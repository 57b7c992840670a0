//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::DOF;

use super::{ArmConfig, AxisConfig};

/// Validate an arm configuration.
///
/// Checks:
/// - Exactly one configuration per joint
/// - Drive train and encoder parameters are positive
/// - Limit switch filters can report both states
/// - Velocity ceiling and recovery floor are ordered
pub fn validate_config(config: &ArmConfig) -> Result<()> {
    if config.axes.len() != DOF {
        return Err(Error::Config(ConfigError::AxisCount {
            found: config.axes.len(),
            expected: DOF,
        }));
    }

    for axis in config.axes.iter() {
        validate_axis(axis)?;
    }

    let max = config.max_velocity.0;
    if !(max > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMaxVelocity(max)));
    }

    let floor = config.recovery_velocity_floor.0;
    if !(floor > 0.0 && floor < max) {
        return Err(Error::Config(ConfigError::InvalidRecoveryFloor(floor)));
    }

    Ok(())
}

/// Validate a single axis configuration.
pub fn validate_axis(config: &AxisConfig) -> Result<()> {
    if !(config.gear_reduction > 0.0) {
        return Err(Error::Config(ConfigError::InvalidGearReduction(
            config.gear_reduction,
        )));
    }

    if !(config.encoder_cpr > 0.0) {
        return Err(Error::Config(ConfigError::InvalidEncoderCpr(config.encoder_cpr)));
    }

    if !config.limit_switch.is_valid() {
        return Err(Error::Config(ConfigError::InvalidLimitFilter {
            samples: config.limit_switch.samples,
            threshold: config.limit_switch.read_threshold,
        }));
    }

    Ok(())
}
