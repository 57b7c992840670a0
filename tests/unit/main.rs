//! Unit test harness for arm-motion.
//!
//! This module organizes configuration tests against the public API.

mod config_parsing;
mod config_validation;
