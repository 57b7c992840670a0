//! Composition root: the six axes, the event scheduler, and the clock.
//!
//! Provides the command submission surface used by protocol and homing
//! collaborators, and `update()` for the host loop.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::Degrees;
use crate::config::{validate_config, ArmConfig, MotionLimits};
use crate::error::{ErrorCode, Result};
use crate::hal::{MonotonicClock, QuadratureEncoder};
use crate::motion::Kinematics;
use crate::motor::Axis;
use crate::scheduler::{
    Command, CommandState, EventScheduler, DEFAULT_QUEUE_CAPACITY, PACKED_MOVEMENT_LEN,
};
use crate::DOF;

/// Multiplier applied to the homing velocity and acceleration by
/// [`Controller::save_position`].
const SAVE_POSITION_SCALE: f64 = 3.0;

/// Owns the arm and runs its command queue.
///
/// The controller is single-threaded and tick-driven: nothing moves unless
/// [`update`](Self::update) is called, and each call may block for as long
/// as the axes need to step to the current setpoint.
///
/// # Example
///
/// ```rust,ignore
/// use arm_motion::{Controller, StdClock};
///
/// let config = arm_motion::load_config("arm.toml")?;
/// let mut arm = Controller::from_config(&config, axes, StdClock::new())?;
///
/// arm.enqueue_homing(1.0, 1.0)?;
/// arm.enqueue_sleep(500_000)?;
/// loop {
///     arm.update()?;
/// }
/// ```
pub struct Controller<STEP, DIR, LIMIT, ENC, DELAY, CLOCK, const N: usize = DEFAULT_QUEUE_CAPACITY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
    CLOCK: MonotonicClock,
{
    axes: [Axis<STEP, DIR, LIMIT, ENC, DELAY>; DOF],
    scheduler: EventScheduler<N>,
    clock: CLOCK,
}

impl<STEP, DIR, LIMIT, ENC, DELAY, CLOCK, const N: usize>
    Controller<STEP, DIR, LIMIT, ENC, DELAY, CLOCK, N>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    ENC: QuadratureEncoder,
    DELAY: DelayNs,
    CLOCK: MonotonicClock,
{
    /// Create a controller over already-built axes.
    pub fn new(axes: [Axis<STEP, DIR, LIMIT, ENC, DELAY>; DOF], clock: CLOCK, limits: MotionLimits) -> Self {
        Self {
            axes,
            scheduler: EventScheduler::new(limits),
            clock,
        }
    }

    /// Create a controller using the scheduler limits from a validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(
        config: &ArmConfig,
        axes: [Axis<STEP, DIR, LIMIT, ENC, DELAY>; DOF],
        clock: CLOCK,
    ) -> Result<Self> {
        validate_config(config)?;
        Ok(Self::new(axes, clock, config.motion_limits()))
    }

    /// Advance the head command to the current clock reading.
    ///
    /// # Errors
    ///
    /// Only pin failures are reported.
    pub fn update(&mut self) -> Result<CommandState> {
        let now_us = self.clock.now_us();
        self.scheduler.tick(now_us, &mut self.axes)
    }

    /// Call [`update`](Self::update) until the queue is empty.
    ///
    /// Does not return while a mechanical fault keeps triggering crash
    /// recovery.
    pub fn run_until_idle(&mut self) -> Result<()> {
        while self.scheduler.queue_length() > 0 {
            self.update()?;
        }
        Ok(())
    }

    /// Validate and queue a command.
    pub fn enqueue(&mut self, command: Command) -> Result<()> {
        self.scheduler.enqueue(command, &self.axes)
    }

    /// Queue a straight-line move.
    pub fn enqueue_movement(
        &mut self,
        targets: [Degrees; DOF],
        kinematics: Kinematics,
        resync_from_encoder: bool,
    ) -> Result<()> {
        self.enqueue(Command::movement(targets, kinematics, resync_from_encoder))
    }

    /// Queue a pause.
    pub fn enqueue_sleep(&mut self, duration_us: u32) -> Result<()> {
        self.enqueue(Command::sleep(duration_us))
    }

    /// Queue the configured homing move, scaled.
    pub fn enqueue_homing(&mut self, velocity_scale: f64, accel_scale: f64) -> Result<()> {
        let homing = self.scheduler.limits().homing;
        self.enqueue(Command::homing(&homing, velocity_scale, accel_scale))
    }

    /// Queue a movement from a packed `[t0..t5, v, a, vi, vf, resync]` record.
    pub fn enqueue_packed(&mut self, record: &[f64; PACKED_MOVEMENT_LEN]) -> Result<()> {
        self.enqueue(Command::from_packed(record))
    }

    /// Queue a move to the angles the encoders currently report, at three
    /// times the homing velocity and acceleration.
    pub fn save_position(&mut self) -> Result<()> {
        let mut targets = [Degrees(0.0); DOF];
        for (target, axis) in targets.iter_mut().zip(self.axes.iter()) {
            *target = axis
                .constraints()
                .steps_to_degrees(axis.read_encoder_position());
        }

        let homing = self.scheduler.limits().homing;
        let kinematics = Kinematics::from_rest(
            homing.velocity * SAVE_POSITION_SCALE,
            homing.acceleration * SAVE_POSITION_SCALE,
        );
        self.enqueue_movement(targets, kinematics, false)
    }

    /// Commands queued, including the executing head.
    #[inline]
    pub fn queue_length(&self) -> u32 {
        self.scheduler.queue_length()
    }

    /// Return the latched enqueue error and reset it.
    #[inline]
    pub fn last_error_and_clear(&mut self) -> ErrorCode {
        self.scheduler.last_error_and_clear()
    }

    /// Drop the head command.
    ///
    /// Homing uses this once every joint sits on its switch.
    pub fn complete_head(&mut self) -> Option<Command> {
        self.scheduler.complete_head()
    }

    /// Commands are pending or executing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.scheduler.queue_length() > 0
    }

    /// A movement or homing command is executing.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.scheduler.is_moving()
    }

    /// The scheduler.
    #[inline]
    pub fn scheduler(&self) -> &EventScheduler<N> {
        &self.scheduler
    }

    /// All axes, base first.
    #[inline]
    pub fn axes(&self) -> &[Axis<STEP, DIR, LIMIT, ENC, DELAY>; DOF] {
        &self.axes
    }

    /// One axis.
    #[inline]
    pub fn axis(&self, index: usize) -> Option<&Axis<STEP, DIR, LIMIT, ENC, DELAY>> {
        self.axes.get(index)
    }

    /// One axis, for the limit switch, encoder, and status setters.
    #[inline]
    pub fn axis_mut(&mut self, index: usize) -> Option<&mut Axis<STEP, DIR, LIMIT, ENC, DELAY>> {
        self.axes.get_mut(index)
    }

    /// The clock.
    #[inline]
    pub fn clock(&self) -> &CLOCK {
        &self.clock
    }

    /// Current joint angles.
    pub fn position_degrees(&self) -> [Degrees; DOF] {
        let mut angles = [Degrees(0.0); DOF];
        for (angle, axis) in angles.iter_mut().zip(self.axes.iter()) {
            *angle = axis.position_degrees();
        }
        angles
    }
}
