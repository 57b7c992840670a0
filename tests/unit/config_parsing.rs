//! Unit tests for TOML configuration parsing.

use std::io::Write;

use arm_motion::config::{load_config, ArmConfig, MechanicalConstraints};

const ARM: &str = r#"
[[axes]]
name = "base"
microsteps = 1000
gear_reduction = 40.0
max_position_steps = 35000
invert_direction = true

[axes.limit_switch]
samples = 10
read_threshold = 0.9
active_high = false

[[axes]]
name = "shoulder"
microsteps = 1000
gear_reduction = 50.0
encoder_threshold_steps = 500

[[axes]]
name = "elbow"
microsteps = 1000
gear_reduction = 50.0

[[axes]]
name = "forearm"
microsteps = 1600
gear_reduction = 39.2
crash_detection = false

[[axes]]
name = "wrist"
microsteps = 1000
gear_reduction = 10.0
encoder_cpr = 2000.0

[[axes]]
name = "flange"
microsteps = 1000
gear_reduction = 19.0
"#;

/// Test parsing a six-axis arm with per-axis overrides.
#[test]
fn test_parse_arm_config() {
    let config: ArmConfig = toml::from_str(ARM).expect("Failed to parse TOML");

    let names: Vec<_> = config.axis_names().collect();
    assert_eq!(names, ["base", "shoulder", "elbow", "forearm", "wrist", "flange"]);

    let base = config.axis("base").expect("Axis not found");
    assert_eq!(base.microsteps.value(), 1000);
    assert_eq!(base.max_position_steps, Some(35000));
    assert!(base.invert_direction);
    assert_eq!(base.limit_switch.samples, 10);
    assert_eq!(base.limit_switch.read_threshold, 0.9);
    assert!(!base.limit_switch.active_high);
    // unset fields in the table keep their defaults
    assert_eq!(base.limit_switch.step_guard_threshold, 0.75);

    let forearm = config.axis("forearm").expect("Axis not found");
    assert_eq!(forearm.microsteps.value(), 1600);
    assert!(!forearm.crash_detection);

    assert_eq!(config.axis("shoulder").unwrap().encoder_threshold_steps, 500);
}

/// Test that omitted settings fall back to the firmware defaults.
#[test]
fn test_defaults() {
    let config: ArmConfig = toml::from_str(ARM).expect("Failed to parse TOML");
    let elbow = config.axis("elbow").expect("Axis not found");

    assert!(elbow.crash_detection);
    assert!(!elbow.invert_direction);
    assert_eq!(elbow.encoder_threshold_steps, 300);
    assert_eq!(elbow.encoder_cpr, 4000.0);
    assert_eq!(elbow.pulse_width_us, 3);
    assert_eq!(elbow.max_position_steps, None);
    assert_eq!(elbow.limit_switch.samples, 20);

    assert_eq!(config.max_velocity.0, 1e-2);
    assert_eq!(config.recovery_velocity_floor.0, 1e-5);
    assert_eq!(
        config.homing.angles,
        [-345.0, -200.0, -280.0, -280.0, -180.0, -360.0]
    );
    assert_eq!(config.homing.velocity.0, 0.04e-3);
}

/// Test the derived per-axis mechanics.
#[test]
fn test_mechanical_constraints_from_parsed_axis() {
    let config: ArmConfig = toml::from_str(ARM).expect("Failed to parse TOML");

    let wrist = MechanicalConstraints::from_config(config.axis("wrist").unwrap());
    // 360 / (1000 * 10)
    assert!((wrist.degrees_per_step - 0.036).abs() < 1e-12);
    // 1000 microsteps / 2000 CPR
    assert_eq!(wrist.steps_per_encoder_count, 0.5);
}

/// Test parsing a homing table.
#[test]
fn test_parse_homing_table() {
    let toml_str = format!(
        "{}\n[homing]\nangles = [-10.0, -20.0, -30.0, -40.0, -50.0, -60.0]\nvelocity = 0.0001\n",
        ARM
    );

    let config: ArmConfig = toml::from_str(&toml_str).expect("Failed to parse TOML");
    assert_eq!(config.homing.angles[5], -60.0);
    assert_eq!(config.homing.velocity.0, 0.0001);
    assert_eq!(config.homing.acceleration.0, 0.03e-9);
}

/// Test loading and validating from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("arm-motion-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("Failed to create file");
    file.write_all(ARM.as_bytes()).expect("Failed to write file");
    drop(file);

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.axes.len(), arm_motion::DOF);

    std::fs::remove_file(&path).ok();
    assert!(load_config(&path).is_err());
}

/// Test that a zero microstep value is rejected during parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = ARM.replacen("microsteps = 1600", "microsteps = 0", 1);

    let result: Result<ArmConfig, _> = toml::from_str(&toml_str);
    assert!(result.is_err(), "Should reject zero microsteps");
}
