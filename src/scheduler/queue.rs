//! FIFO event scheduler driving the joints one tick at a time.

use heapless::Deque;

use crate::config::units::{Degrees, DegreesPerMicrosecond};
use crate::config::MotionLimits;
use crate::error::{ErrorCode, QueueError, Result};
use crate::motion::TrajectoryState;
use crate::motor::Joint;
use crate::DOF;

use super::command::Command;

/// Default command queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Lifecycle of the command at the head of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandState {
    /// Nothing started (or nothing queued).
    Idle,
    /// The head command is executing.
    Active,
    /// The head command finished and was removed.
    Completed,
}

/// Work in progress for the head command.
#[derive(Debug, Clone, PartialEq)]
enum Activity {
    Sleeping { started_us: u64 },
    Moving(TrajectoryState),
}

/// Command queue plus the state machine for its head.
///
/// Exactly one command executes at a time. Each [`tick`](Self::tick)
/// advances it against the clock reading it is given; the scheduler never
/// reads time or hardware on its own.
#[derive(Debug)]
pub struct EventScheduler<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    queue: Deque<Command, N>,
    activity: Option<Activity>,
    last_error: ErrorCode,
    limits: MotionLimits,
}

impl<const N: usize> Default for EventScheduler<N> {
    fn default() -> Self {
        Self::new(MotionLimits::default())
    }
}

impl<const N: usize> EventScheduler<N> {
    /// Create an empty scheduler.
    pub fn new(limits: MotionLimits) -> Self {
        Self {
            queue: Deque::new(),
            activity: None,
            last_error: ErrorCode::Ok,
            limits,
        }
    }

    /// Scheduler-wide motion limits.
    #[inline]
    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    /// Validate a command and append it to the queue.
    ///
    /// # Errors
    ///
    /// Returns the validation failure and latches its [`ErrorCode`]; the
    /// queue is left unchanged.
    pub fn enqueue<J: Joint>(&mut self, command: Command, axes: &[J; DOF]) -> Result<()> {
        let result = self
            .validate(&command, axes)
            .and_then(|()| self.queue.push_back(command).map_err(|_| QueueError::QueueFull));

        if let Err(e) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("command rejected: {}", ErrorCode::from(&e));
            self.last_error = ErrorCode::from(&e);
            return Err(e.into());
        }
        Ok(())
    }

    fn validate<J: Joint>(&self, command: &Command, axes: &[J; DOF]) -> core::result::Result<(), QueueError> {
        let movement = match command {
            Command::Sleep { .. } => return Ok(()),
            Command::Movement(m) | Command::Homing(m) => m,
        };

        for (axis, (joint, target)) in axes.iter().zip(movement.targets.iter()).enumerate() {
            let max = joint.max_degrees();
            let outside = !target.0.is_finite()
                || match max {
                    Some(max) if !command.is_homing() => target.0 > max.0 || target.0 < 0.0,
                    _ => false,
                };
            if outside {
                return Err(QueueError::OutsideMotorBounds {
                    axis,
                    target: target.0,
                    max: max.map_or(f64::INFINITY, |m| m.0),
                });
            }
        }

        let kinematics = &movement.kinematics;
        let requested = kinematics.peak_velocity.0;
        let max = self.limits.max_velocity.0;
        if requested > max {
            return Err(QueueError::VelocityTooHigh { requested, max });
        }

        // zero is allowed; it plans a degenerate profile that completes in place
        let parameters = [
            ("peak velocity", requested),
            ("acceleration", kinematics.acceleration.0),
            ("initial velocity", kinematics.initial_velocity.0),
            ("final velocity", kinematics.final_velocity.0),
        ];
        let invalid = parameters
            .iter()
            .find(|(_, v)| !(v.is_finite() && *v >= 0.0));
        if let Some(&(field, value)) = invalid {
            return Err(QueueError::InvalidKinematics { field, value });
        }

        Ok(())
    }

    /// Advance the head command to `now_us`.
    ///
    /// Returns the state of the head after this tick. Pin failures are the
    /// only errors; refused steps and encoder mismatches are handled here.
    pub fn tick<J: Joint>(&mut self, now_us: u64, axes: &mut [J; DOF]) -> Result<CommandState> {
        let head = match self.queue.front() {
            Some(command) => *command,
            None => return Ok(CommandState::Idle),
        };

        match head {
            Command::Sleep { duration_us } => {
                let started_us = match self.activity {
                    Some(Activity::Sleeping { started_us }) => started_us,
                    _ => {
                        self.activity = Some(Activity::Sleeping { started_us: now_us });
                        now_us
                    }
                };

                if now_us.saturating_sub(started_us) >= u64::from(duration_us) {
                    self.complete_head();
                    return Ok(CommandState::Completed);
                }
                Ok(CommandState::Active)
            }
            Command::Movement(_) | Command::Homing(_) => self.tick_movement(now_us, axes),
        }
    }

    fn tick_movement<J: Joint>(&mut self, now_us: u64, axes: &mut [J; DOF]) -> Result<CommandState> {
        if !self.is_moving() {
            self.start_movement(now_us, axes);
        }

        let plan = match &self.activity {
            Some(Activity::Moving(plan)) => plan.clone(),
            _ => return Ok(CommandState::Active),
        };

        // already at target, or no usable velocity or acceleration
        if plan.is_degenerate() {
            self.complete_head();
            return Ok(CommandState::Completed);
        }

        if plan.is_finished(now_us) {
            for (joint, target) in axes.iter_mut().zip(plan.target.iter()) {
                joint.catch_up_to(*target)?;
            }
            #[cfg(feature = "defmt")]
            defmt::info!("movement complete after {} us", plan.elapsed_us(now_us));
            self.complete_head();
            return Ok(CommandState::Completed);
        }

        let setpoints = plan.setpoints(now_us);
        for (joint, setpoint) in axes.iter_mut().zip(setpoints.iter()) {
            joint.catch_up_to(*setpoint)?;
        }

        if let Some(_axis) = axes.iter().position(|joint| !joint.check_against_encoder()) {
            #[cfg(feature = "defmt")]
            {
                let (encoder, motor) = axes[_axis].encoder_and_motor_steps();
                defmt::warn!(
                    "crash on axis {}: motor {} steps, encoder {} steps",
                    _axis,
                    motor,
                    encoder
                );
            }
            self.recover(now_us, axes);
        }

        Ok(CommandState::Active)
    }

    /// Plan the head movement from the current joint positions.
    fn start_movement<J: Joint>(&mut self, now_us: u64, axes: &mut [J; DOF]) {
        let movement = match self.queue.front().and_then(Command::as_movement) {
            Some(m) => *m,
            None => return,
        };

        if movement.resync_from_encoder {
            for joint in axes.iter_mut() {
                if !joint.resync_from_encoder() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("encoder position past axis bound, keeping step count");
                }
            }
        }

        let mut start = [Degrees(0.0); DOF];
        for (angle, joint) in start.iter_mut().zip(axes.iter()) {
            *angle = joint.position_degrees();
        }

        let plan = TrajectoryState::plan(start, movement.targets, &movement.kinematics, now_us);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "movement start: {} deg over {} us at {} deg/us",
            plan.largest_degree_change(),
            plan.profile.t_finish,
            plan.profile.peak_velocity
        );

        self.activity = Some(Activity::Moving(plan));
    }

    /// Halve the head's peak velocity, force an encoder resync, and re-plan.
    ///
    /// Halving stops at the recovery floor; a command already slower than
    /// the floor keeps its velocity.
    fn recover<J: Joint>(&mut self, now_us: u64, axes: &mut [J; DOF]) {
        let floor = self.limits.recovery_velocity_floor.0;
        if let Some(movement) = self.queue.front_mut().and_then(Command::as_movement_mut) {
            let current = movement.kinematics.peak_velocity.0;
            let halved = current / 2.0;
            let next = if halved >= floor { halved } else { current.min(floor) };
            movement.kinematics.peak_velocity = DegreesPerMicrosecond(next);
            movement.resync_from_encoder = true;
        }
        self.start_movement(now_us, axes);
    }

    /// Drop the head command, whatever its state.
    pub fn complete_head(&mut self) -> Option<Command> {
        self.activity = None;
        self.queue.pop_front()
    }

    /// Commands queued, including the executing head.
    #[inline]
    pub fn queue_length(&self) -> u32 {
        self.queue.len() as u32
    }

    /// Maximum number of queued commands.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Return the latched error code and reset it to `Ok`.
    pub fn last_error_and_clear(&mut self) -> ErrorCode {
        core::mem::take(&mut self.last_error)
    }

    /// The head command.
    #[inline]
    pub fn head(&self) -> Option<&Command> {
        self.queue.front()
    }

    /// State of the head command.
    pub fn head_state(&self) -> CommandState {
        if self.activity.is_some() {
            CommandState::Active
        } else {
            CommandState::Idle
        }
    }

    /// A command is executing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.activity.is_some()
    }

    /// A movement or homing command is executing.
    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self.activity, Some(Activity::Moving(_)))
    }

    /// Plan of the executing movement.
    pub fn trajectory(&self) -> Option<&TrajectoryState> {
        match &self.activity {
            Some(Activity::Moving(plan)) => Some(plan),
            _ => None,
        }
    }
}
