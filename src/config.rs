//! Construction-time timing configuration.
//!
//! Values are fixed for the lifetime of a driver. [`EncoderConfig::new`] is a
//! `const fn` so a bad configuration can fail the build when the driver is a
//! `static`:
//!
//! ```
//! use rotary_push::EncoderConfig;
//!
//! const KNOB: EncoderConfig = match EncoderConfig::new(50, 4, 2, 1_000) {
//!     Ok(cfg) => cfg,
//!     Err(_) => panic!("bad knob timing"),
//! };
//! assert_eq!(KNOB.debounce_us_per_check(), 12);
//! ```

use crate::error::ConfigError;
use crate::timing::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    debounce_us_per_check: u32,
    debounce_checks: u32,
    rotary_timeout_ms: Millis,
    click_vs_hold_ms: Millis,
}

impl EncoderConfig {
    /// 50us debounce sampled 4 times, 2ms rotary timeout, 1s click/hold split.
    pub const DEFAULT: Self = Self {
        debounce_us_per_check: 50 / 4,
        debounce_checks: 4,
        rotary_timeout_ms: 2,
        click_vs_hold_ms: 1_000,
    };

    /// Build a configuration.
    ///
    /// # Arguments
    /// * `total_debounce_us` — window over which a rotary edge must stay stable
    /// * `debounce_checks` — number of samples taken across that window (at least 1)
    /// * `rotary_timeout_ms` — minimum spacing between accepted rotary ticks
    /// * `click_vs_hold_ms` — presses this long or longer count as holds
    pub const fn new(
        total_debounce_us: u32,
        debounce_checks: u32,
        rotary_timeout_ms: Millis,
        click_vs_hold_ms: Millis,
    ) -> Result<Self, ConfigError> {
        if debounce_checks == 0 {
            return Err(ConfigError::ZeroDebounceChecks);
        }

        let debounce_us_per_check = total_debounce_us / debounce_checks;
        let debounce_us = debounce_us_per_check as u64 * debounce_checks as u64;
        let timeout_us = rotary_timeout_ms as u64 * 1_000;
        if timeout_us < debounce_us {
            return Err(ConfigError::TimeoutShorterThanDebounce {
                timeout_us,
                debounce_us,
            });
        }

        Ok(Self {
            debounce_us_per_check,
            debounce_checks,
            rotary_timeout_ms,
            click_vs_hold_ms,
        })
    }

    pub const fn debounce_us_per_check(&self) -> u32 {
        self.debounce_us_per_check
    }

    pub const fn debounce_checks(&self) -> u32 {
        self.debounce_checks
    }

    pub const fn rotary_timeout_ms(&self) -> Millis {
        self.rotary_timeout_ms
    }

    pub const fn click_vs_hold_ms(&self) -> Millis {
        self.click_vs_hold_ms
    }

    /// Longest time a rotary handler can spin in its debounce loop.
    ///
    /// Interrupts stay masked for this long, so callers must be able to
    /// tolerate that much added latency on every other interrupt source.
    pub const fn worst_case_debounce_us(&self) -> u64 {
        self.debounce_us_per_check as u64 * self.debounce_checks as u64
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
