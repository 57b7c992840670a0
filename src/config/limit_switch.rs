//! Limit switch debounce configuration.

use serde::Deserialize;

/// Majority-vote filter applied to the limit switch input.
///
/// Motor switching induces noise on the switch lines, so a reading only
/// counts as active when more than `threshold` of `samples` reads agree.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitSwitchConfig {
    /// Number of reads per filtered sample.
    #[serde(default = "default_samples")]
    pub samples: u8,

    /// Delay between reads in microseconds.
    #[serde(default = "default_sample_delay")]
    pub sample_delay_us: u32,

    /// Active fraction required by `read_limit_switch`.
    #[serde(default = "default_read_threshold")]
    pub read_threshold: f64,

    /// Active fraction that blocks a counter-clockwise step.
    #[serde(default = "default_step_guard_threshold")]
    pub step_guard_threshold: f64,

    /// Whether a high level means the switch is pressed.
    #[serde(default = "default_active_high")]
    pub active_high: bool,
}

fn default_samples() -> u8 {
    20
}

fn default_sample_delay() -> u32 {
    1
}

fn default_read_threshold() -> f64 {
    0.6
}

fn default_step_guard_threshold() -> f64 {
    0.75
}

fn default_active_high() -> bool {
    true
}

impl Default for LimitSwitchConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            sample_delay_us: default_sample_delay(),
            read_threshold: default_read_threshold(),
            step_guard_threshold: default_step_guard_threshold(),
            active_high: default_active_high(),
        }
    }
}

impl LimitSwitchConfig {
    /// Check that the filter can ever report both states.
    pub fn is_valid(&self) -> bool {
        let in_range = |t: f64| (0.0..1.0).contains(&t);
        self.samples > 0 && in_range(self.read_threshold) && in_range(self.step_guard_threshold)
    }

    /// Decide a filtered reading from the number of active samples.
    #[inline]
    pub fn is_active(&self, active_samples: u8, threshold: f64) -> bool {
        if self.samples == 0 {
            return false;
        }
        (active_samples as f64 / self.samples as f64) > threshold
    }
}
