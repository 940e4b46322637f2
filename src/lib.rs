//! Interrupt-driven driver for a quadrature rotary encoder with a push button.
//!
//! Three GPIO interrupts (falling edge on each encoder channel, any edge on the
//! button) feed a small amount of shared state; the main loop polls it:
//!
//! - knob: net detents turned since the last check, clockwise positive
//! - button: clicks since the last check, whether a hold is in progress, and
//!   how long the current or last hold lasted
//!
//! Modules:
//! - `timing` — wrapping millisecond clock helpers
//! - `rotary` — debounced quadrature decoding with a post-tick timeout
//! - `button` — click vs. hold state machine
//! - `input` — [`RotaryEncoderWithPush`], the driver that ties them to pins
//! - `wiring` — ESP32 pin profiles and HAL glue (chip features only)
//!
//! # Features
//!
//! - **`esp32s3`** / **`esp32c3`** — on-target support and the demo binary
//! - **`defmt`** — `defmt::Format` on public types and debug logging from
//!   the handlers

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod button;
pub mod config;
pub mod error;
pub mod input;
pub mod rotary;
pub mod timing;

#[cfg(feature = "esp")]
pub mod wiring;

#[cfg(test)]
mod sim;

pub use button::{ButtonEvent, PressState};
pub use config::EncoderConfig;
pub use error::ConfigError;
pub use input::{Edge, InterruptOutcome, InterruptPin, KnobPins, RotaryEncoderWithPush};
pub use rotary::{Channel, Direction};
pub use timing::{Clock, Millis};
