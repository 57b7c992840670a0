//! Event scheduling for arm-motion.
//!
//! Commands are validated on the way in, queued by value, and executed one
//! at a time from the head of a fixed-capacity FIFO.

mod command;
mod queue;

pub use command::{Command, Movement, MovementBuilder, PACKED_MOVEMENT_LEN};
pub use queue::{CommandState, EventScheduler, DEFAULT_QUEUE_CAPACITY};
