//! Unit tests for configuration validation.

use arm_motion::config::{parse_config, validate_config, ArmConfig};
use arm_motion::error::{ConfigError, Error};

fn arm_toml(extra_axis_line: &str) -> String {
    let mut toml = String::new();
    for (i, name) in ["base", "shoulder", "elbow", "forearm", "wrist", "flange"]
        .iter()
        .enumerate()
    {
        toml.push_str(&format!(
            "[[axes]]\nname = \"{name}\"\nmicrosteps = 1000\ngear_reduction = 40.0\n"
        ));
        if i == 2 {
            toml.push_str(extra_axis_line);
            toml.push('\n');
        }
    }
    toml
}

fn parse(toml_str: &str) -> ArmConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = parse(&arm_toml(""));
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails with fewer than six axes.
#[test]
fn test_too_few_axes() {
    let mut config = parse(&arm_toml(""));
    config.axes.pop();

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::AxisCount { found: 5, expected: 6 }))
    ));
}

/// Test validation fails for a non-positive gear reduction.
#[test]
fn test_invalid_gear_reduction() {
    let toml = arm_toml("").replacen("gear_reduction = 40.0", "gear_reduction = -2.0", 1);

    assert!(matches!(
        parse_config(&toml),
        Err(Error::Config(ConfigError::InvalidGearReduction(_)))
    ));
}

/// Test validation fails for a zero encoder resolution.
#[test]
fn test_invalid_encoder_cpr() {
    let result = validate_config(&parse(&arm_toml("encoder_cpr = 0.0")));

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidEncoderCpr(_)))
    ));
}

/// Test validation fails for an unusable limit switch filter.
#[test]
fn test_invalid_limit_filter() {
    let zero_samples = parse(&arm_toml("limit_switch = { samples = 0 }"));
    assert!(matches!(
        validate_config(&zero_samples),
        Err(Error::Config(ConfigError::InvalidLimitFilter { samples: 0, .. }))
    ));

    let threshold = parse(&arm_toml("limit_switch = { read_threshold = 1.0 }"));
    assert!(validate_config(&threshold).is_err());
}

/// Test validation of the velocity ceiling and recovery floor.
#[test]
fn test_invalid_velocity_limits() {
    let mut config = parse(&arm_toml(""));
    config.max_velocity.0 = 0.0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMaxVelocity(_)))
    ));

    let mut config = parse(&arm_toml(""));
    config.recovery_velocity_floor.0 = config.max_velocity.0 * 2.0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidRecoveryFloor(_)))
    ));
}

/// Test that NaN settings do not slip through.
#[test]
fn test_nan_rejected() {
    let mut config = parse(&arm_toml(""));
    config.axes[4].gear_reduction = f64::NAN;
    assert!(validate_config(&config).is_err());
}
