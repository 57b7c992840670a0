//! Queued motion commands and a builder for movements.

use crate::config::units::{Degrees, DegreesPerMicrosecond, DegreesPerMicrosecondSquared};
use crate::config::HomingConfig;
use crate::error::{ConfigError, Result};
use crate::motion::Kinematics;
use crate::DOF;

/// Number of `f64` values in a packed movement record.
pub const PACKED_MOVEMENT_LEN: usize = DOF + 5;

/// A straight-line joint-space move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Movement {
    /// Joint angles to reach.
    pub targets: [Degrees; DOF],
    /// Requested velocity profile.
    pub kinematics: Kinematics,
    /// Overwrite logical positions with encoder readings before planning.
    pub resync_from_encoder: bool,
}

/// One entry in the event queue.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move all joints to target angles.
    Movement(Movement),
    /// Do nothing for a while.
    Sleep {
        /// Pause length in microseconds.
        duration_us: u32,
    },
    /// Drive every joint toward its reference switch.
    Homing(Movement),
}

impl Command {
    /// Create a movement command.
    pub fn movement(
        targets: [Degrees; DOF],
        kinematics: Kinematics,
        resync_from_encoder: bool,
    ) -> Self {
        Command::Movement(Movement {
            targets,
            kinematics,
            resync_from_encoder,
        })
    }

    /// Create a sleep command.
    pub fn sleep(duration_us: u32) -> Self {
        Command::Sleep { duration_us }
    }

    /// Create a homing command from the configured reference move.
    ///
    /// `velocity_scale` and `accel_scale` multiply the configured homing
    /// velocity and acceleration.
    pub fn homing(config: &HomingConfig, velocity_scale: f64, accel_scale: f64) -> Self {
        Command::Homing(Movement {
            targets: config.targets(),
            kinematics: Kinematics::from_rest(
                config.velocity * velocity_scale,
                config.acceleration * accel_scale,
            ),
            resync_from_encoder: false,
        })
    }

    /// Decode a packed `[t0..t5, v, a, vi, vf, resync]` record.
    ///
    /// `resync` is truncated toward zero and true when nonzero, so `1.0`
    /// and `-1.0` request a resync while `0.7` does not.
    pub fn from_packed(record: &[f64; PACKED_MOVEMENT_LEN]) -> Self {
        let mut targets = [Degrees(0.0); DOF];
        for (target, value) in targets.iter_mut().zip(record.iter()) {
            *target = Degrees(*value);
        }

        Command::movement(
            targets,
            Kinematics {
                peak_velocity: DegreesPerMicrosecond(record[DOF]),
                acceleration: DegreesPerMicrosecondSquared(record[DOF + 1]),
                initial_velocity: DegreesPerMicrosecond(record[DOF + 2]),
                final_velocity: DegreesPerMicrosecond(record[DOF + 3]),
            },
            record[DOF + 4] as i64 != 0,
        )
    }

    /// Movement payload of a movement or homing command.
    #[inline]
    pub fn as_movement(&self) -> Option<&Movement> {
        match self {
            Command::Movement(m) | Command::Homing(m) => Some(m),
            Command::Sleep { .. } => None,
        }
    }

    pub(crate) fn as_movement_mut(&mut self) -> Option<&mut Movement> {
        match self {
            Command::Movement(m) | Command::Homing(m) => Some(m),
            Command::Sleep { .. } => None,
        }
    }

    /// Whether this is a homing command.
    #[inline]
    pub fn is_homing(&self) -> bool {
        matches!(self, Command::Homing(_))
    }
}

/// Builder for movement commands.
#[derive(Debug, Clone)]
pub struct MovementBuilder {
    targets: Option<[Degrees; DOF]>,
    peak_velocity: Option<DegreesPerMicrosecond>,
    acceleration: Option<DegreesPerMicrosecondSquared>,
    initial_velocity: DegreesPerMicrosecond,
    final_velocity: DegreesPerMicrosecond,
    resync_from_encoder: bool,
}

impl Default for MovementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementBuilder {
    /// Create a new movement builder.
    pub fn new() -> Self {
        Self {
            targets: None,
            peak_velocity: None,
            acceleration: None,
            initial_velocity: DegreesPerMicrosecond(0.0),
            final_velocity: DegreesPerMicrosecond(0.0),
            resync_from_encoder: false,
        }
    }

    /// Set all target angles.
    pub fn targets(mut self, targets: [f64; DOF]) -> Self {
        self.targets = Some(targets.map(Degrees));
        self
    }

    /// Set one target angle; other joints default to zero.
    ///
    /// Indices past the last joint are ignored.
    pub fn target(mut self, axis: usize, angle: Degrees) -> Self {
        let targets = self.targets.get_or_insert([Degrees(0.0); DOF]);
        if let Some(slot) = targets.get_mut(axis) {
            *slot = angle;
        }
        self
    }

    /// Set the requested peak velocity.
    pub fn peak_velocity(mut self, velocity: DegreesPerMicrosecond) -> Self {
        self.peak_velocity = Some(velocity);
        self
    }

    /// Set the acceleration and deceleration rate.
    pub fn acceleration(mut self, accel: DegreesPerMicrosecondSquared) -> Self {
        self.acceleration = Some(accel);
        self
    }

    /// Set the velocity at the start of the move.
    pub fn initial_velocity(mut self, velocity: DegreesPerMicrosecond) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// Set the velocity at the end of the move.
    pub fn final_velocity(mut self, velocity: DegreesPerMicrosecond) -> Self {
        self.final_velocity = velocity;
        self
    }

    /// Resync logical positions from the encoders before planning.
    pub fn resync_from_encoder(mut self, resync: bool) -> Self {
        self.resync_from_encoder = resync;
        self
    }

    /// Build the movement command.
    ///
    /// # Errors
    ///
    /// Returns an error if targets, peak velocity, or acceleration are missing.
    pub fn build(self) -> Result<Command> {
        let targets = self.targets.ok_or(ConfigError::MissingField("targets"))?;
        let peak_velocity = self
            .peak_velocity
            .ok_or(ConfigError::MissingField("peak_velocity"))?;
        let acceleration = self
            .acceleration
            .ok_or(ConfigError::MissingField("acceleration"))?;

        Ok(Command::movement(
            targets,
            Kinematics {
                peak_velocity,
                acceleration,
                initial_velocity: self.initial_velocity,
                final_velocity: self.final_velocity,
            },
            self.resync_from_encoder,
        ))
    }
}
