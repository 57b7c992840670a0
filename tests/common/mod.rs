//! Simulated arm hardware shared by the integration tests.
//!
//! Each simulated motor couples its STEP, DIR, encoder, and limit switch
//! through one shared shaft, so pulses emitted by an axis show up on its
//! encoder the way they would on the bench.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use arm_motion::{ArmConfig, Axis, AxisBuilder, Controller, MonotonicClock, QuadratureEncoder};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Six axes, 1000 microsteps each, 0.009° per step on the base.
///
/// The base is bounded at 180° (20000 steps).
pub const ARM_CONFIG: &str = r#"
max_velocity = 0.01
recovery_velocity_floor = 0.00001

[homing]
velocity = 0.00004
acceleration = 0.00000000003

[[axes]]
name = "base"
microsteps = 1000
gear_reduction = 40.0
max_position_steps = 20000

[[axes]]
name = "shoulder"
microsteps = 1000
gear_reduction = 40.0

[[axes]]
name = "elbow"
microsteps = 1000
gear_reduction = 40.0

[[axes]]
name = "forearm"
microsteps = 1000
gear_reduction = 40.0

[[axes]]
name = "wrist"
microsteps = 1000
gear_reduction = 40.0

[[axes]]
name = "flange"
microsteps = 1000
gear_reduction = 40.0
"#;

/// Encoder counts per motor step for [`ARM_CONFIG`] (4000 CPR / 1000 microsteps).
pub const COUNTS_PER_STEP: i64 = 4;

#[derive(Debug, Default)]
struct Shaft {
    dir_high: bool,
    step_high: bool,
    steps: i64,
    pulses: u64,
    slipping: bool,
    encoder_offset: i64,
    home_steps: Option<i64>,
}

/// One motor with its encoder and home switch.
#[derive(Debug, Clone, Default)]
pub struct SimMotor(Rc<RefCell<Shaft>>);

impl SimMotor {
    /// Actual shaft position in motor steps.
    pub fn shaft_steps(&self) -> i64 {
        self.0.borrow().steps
    }

    /// Rising edges seen on STEP.
    pub fn pulses(&self) -> u64 {
        self.0.borrow().pulses
    }

    /// While slipping, pulses do not turn the shaft.
    pub fn set_slipping(&self, slipping: bool) {
        self.0.borrow_mut().slipping = slipping;
    }

    /// Shift the encoder reading without moving the shaft.
    pub fn shift_encoder(&self, counts: i64) {
        self.0.borrow_mut().encoder_offset += counts;
    }

    /// The home switch closes at or below this shaft position.
    pub fn place_home_switch(&self, steps: i64) {
        self.0.borrow_mut().home_steps = Some(steps);
    }

    pub fn step_pin(&self) -> SimStepPin {
        SimStepPin(self.clone())
    }

    pub fn dir_pin(&self) -> SimDirPin {
        SimDirPin(self.clone())
    }

    pub fn encoder(&self) -> SimEncoder {
        SimEncoder(self.clone())
    }

    pub fn limit_switch(&self) -> SimSwitch {
        SimSwitch(self.clone())
    }
}

pub struct SimStepPin(SimMotor);

impl ErrorType for SimStepPin {
    type Error = Infallible;
}

impl OutputPin for SimStepPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut shaft = self.0 .0.borrow_mut();
        if !shaft.step_high {
            shaft.pulses += 1;
            if !shaft.slipping {
                shaft.steps += if shaft.dir_high { 1 } else { -1 };
            }
        }
        shaft.step_high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 .0.borrow_mut().step_high = false;
        Ok(())
    }
}

pub struct SimDirPin(SimMotor);

impl ErrorType for SimDirPin {
    type Error = Infallible;
}

impl OutputPin for SimDirPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 .0.borrow_mut().dir_high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 .0.borrow_mut().dir_high = false;
        Ok(())
    }
}

pub struct SimEncoder(SimMotor);

impl QuadratureEncoder for SimEncoder {
    fn count(&self) -> i64 {
        let shaft = self.0 .0.borrow();
        shaft.steps * COUNTS_PER_STEP + shaft.encoder_offset
    }

    fn reset(&mut self) -> i64 {
        let previous = self.count();
        let mut shaft = self.0 .0.borrow_mut();
        shaft.encoder_offset = -shaft.steps * COUNTS_PER_STEP;
        previous
    }
}

/// Active-high home switch.
pub struct SimSwitch(SimMotor);

impl ErrorType for SimSwitch {
    type Error = Infallible;
}

impl InputPin for SimSwitch {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let shaft = self.0 .0.borrow();
        Ok(shaft.home_steps.is_some_and(|home| shaft.steps <= home))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Clock that advances by a fixed amount every time it is read.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<u64>>,
    step_us: u64,
}

impl SimClock {
    pub fn ticking(step_us: u64) -> Self {
        Self {
            now: Rc::default(),
            step_us,
        }
    }

    pub fn set(&self, us: u64) {
        self.now.set(us);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl MonotonicClock for SimClock {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step_us);
        now
    }
}

pub type SimAxis = Axis<SimStepPin, SimDirPin, SimSwitch, SimEncoder, NoopDelay>;

pub type SimController = Controller<SimStepPin, SimDirPin, SimSwitch, SimEncoder, NoopDelay, SimClock>;

/// A controller wired to simulated hardware, plus handles to that hardware.
pub struct SimArm {
    pub controller: SimController,
    pub motors: [SimMotor; arm_motion::DOF],
    pub clock: SimClock,
}

pub fn arm_config() -> ArmConfig {
    arm_motion::parse_config(ARM_CONFIG).expect("test configuration is valid")
}

pub fn build_axis(config: &ArmConfig, index: usize, motor: &SimMotor) -> SimAxis {
    AxisBuilder::new()
        .from_config(config, index)
        .expect("axis index in range")
        .step_pin(motor.step_pin())
        .dir_pin(motor.dir_pin())
        .limit_pin(motor.limit_switch())
        .encoder(motor.encoder())
        .delay(NoopDelay::new())
        .build()
        .expect("axis builds")
}

/// Build an arm whose clock advances `step_us` per update.
pub fn sim_arm(step_us: u64) -> SimArm {
    let config = arm_config();
    let motors: [SimMotor; arm_motion::DOF] = Default::default();
    let axes = core::array::from_fn(|i| build_axis(&config, i, &motors[i]));
    let clock = SimClock::ticking(step_us);
    let controller =
        Controller::from_config(&config, axes, clock.clone()).expect("controller builds");

    SimArm {
        controller,
        motors,
        clock,
    }
}
