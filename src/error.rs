//! Error types for the encoder driver.

use core::fmt;

/// Rejected construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The debounce window must be sampled at least once.
    ZeroDebounceChecks,

    /// The rotary timeout is shorter than the debounce window, so bounce
    /// could be accepted as a second tick.
    TimeoutShorterThanDebounce {
        timeout_us: u64,
        debounce_us: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ZeroDebounceChecks => write!(f, "debounce check count must be at least 1"),
            ConfigError::TimeoutShorterThanDebounce { timeout_us, debounce_us } => write!(
                f,
                "rotary timeout ({}us) is shorter than the debounce window ({}us)",
                timeout_us, debounce_us
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::ZeroDebounceChecks => defmt::write!(f, "zero debounce checks"),
            ConfigError::TimeoutShorterThanDebounce { timeout_us, debounce_us } => defmt::write!(
                f,
                "rotary timeout {}us shorter than debounce {}us",
                timeout_us,
                debounce_us
            ),
        }
    }
}
