//! Rotary encoder with push button, as one interrupt-driven driver.
//!
//! This module provides:
//! - `RotaryEncoderWithPush`, which owns the pins and all shared input state
//! - the three edge handlers and a `handle_interrupt` dispatcher for a shared
//!   GPIO vector
//! - the polling API the main loop uses to read and clear knob/button state
//!
//! All state is kept behind `critical_section` so handlers and main context can
//! share it. Handlers run their whole body, debounce spin included, in one
//! critical section; see [`EncoderConfig::worst_case_debounce_us`].
//!
//! Typical use keeps the driver in a `static` so the interrupt vector can
//! reach it:
//!
//! ```ignore
//! static KNOB: RotaryEncoderWithPush<Input<'static>, Input<'static>, Input<'static>, Delay, SystemClock> =
//!     RotaryEncoderWithPush::new(EncoderConfig::DEFAULT, SystemClock);
//!
//! #[handler]
//! fn handler() {
//!     KNOB.handle_interrupt();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::button::{ButtonEvent, ButtonState};
use crate::config::EncoderConfig;
use crate::rotary::{Channel, Direction, RotaryState};
use crate::timing::{Clock, Millis};

/// Pin transition an interrupt is armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Falling,
    Rising,
    Any,
}

/// An input that can raise and latch an edge interrupt.
pub trait InterruptPin: InputPin {
    /// Arm the interrupt for `edge`.
    fn listen(&mut self, edge: Edge);

    /// Report whether this pin's interrupt is pending, acknowledging it.
    fn take_interrupt(&mut self) -> bool;
}

/// Hardware the driver takes over at [`RotaryEncoderWithPush::setup`].
pub struct KnobPins<A, B, P, D> {
    pub channel_a: A,
    pub channel_b: B,
    pub button: P,
    /// Microsecond busy-wait used by the rotary debounce loop.
    pub delay: D,
}

/// Everything that happened during one pass of [`RotaryEncoderWithPush::handle_interrupt`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptOutcome {
    pub rotation: Option<Direction>,
    pub button: Option<ButtonEvent>,
}

pub struct RotaryEncoderWithPush<A, B, P, D, C> {
    pins: Mutex<RefCell<Option<KnobPins<A, B, P, D>>>>,
    rotary: RotaryState,
    button: ButtonState,
    config: EncoderConfig,
    clock: C,
}

impl<A, B, P, D, C> RotaryEncoderWithPush<A, B, P, D, C>
where
    C: Clock,
{
    pub const fn new(config: EncoderConfig, clock: C) -> Self {
        Self {
            pins: Mutex::new(RefCell::new(None)),
            rotary: RotaryState::new(),
            button: ButtonState::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Knob
    // -----------------------------------------------------------------------

    /// Net detents turned since the last call (clockwise positive), then zero.
    pub fn retrieve_offset_since_last_check(&self) -> i32 {
        critical_section::with(|cs| self.rotary.take_offset(cs))
    }

    /// Whether the knob is off from where it was at the last retrieval.
    /// Does not clear anything.
    pub fn knob_changed_since_last_check(&self) -> bool {
        critical_section::with(|cs| self.rotary.offset(cs) != 0)
    }

    // -----------------------------------------------------------------------
    // Button
    // -----------------------------------------------------------------------

    pub fn button_is_currently_depressed(&self) -> bool {
        critical_section::with(|cs| self.button.is_depressed(cs))
    }

    /// Held down for longer than a click can last.
    pub fn button_hold_occurring(&self) -> bool {
        // Clock is read under the lock so a press landing in between cannot
        // start after `now`.
        critical_section::with(|cs| {
            self.button
                .hold_occurring(cs, self.clock.now_ms(), self.config.click_vs_hold_ms())
        })
    }

    /// While held: how long so far. Once released: the last hold's length,
    /// which clicks do not overwrite.
    pub fn retrieve_millis_held_for(&self) -> Millis {
        critical_section::with(|cs| self.button.millis_held_for(cs, self.clock.now_ms()))
    }

    pub fn button_clicked_since_last_check(&self) -> bool {
        critical_section::with(|cs| self.button.click_count(cs) != 0)
    }

    /// Clicks since the last call, then zero.
    pub fn retrieve_click_count(&self) -> u32 {
        critical_section::with(|cs| self.button.take_click_count(cs))
    }
}

impl<A, B, P, D, C> RotaryEncoderWithPush<A, B, P, D, C>
where
    A: InputPin,
    B: InputPin,
    P: InputPin,
    D: DelayNs,
    C: Clock,
{
    /// Take ownership of pins already armed by the caller.
    ///
    /// Replaces (and drops) any pins installed earlier.
    pub fn install(&self, pins: KnobPins<A, B, P, D>) {
        critical_section::with(|cs| {
            self.pins.borrow_ref_mut(cs).replace(pins);
        });
    }

    // -----------------------------------------------------------------------
    // Edge handlers
    // -----------------------------------------------------------------------
    //
    // Each is a no-op until pins are installed.

    /// Falling edge on channel A.
    pub fn on_channel_a_falling(&self) -> Option<Direction> {
        critical_section::with(|cs| {
            let mut pins = self.pins.borrow_ref_mut(cs);
            let pins = pins.as_mut()?;
            self.rotary.handle_falling_edge(
                cs,
                Channel::A,
                &mut pins.channel_a,
                &mut pins.channel_b,
                &mut pins.delay,
                &self.clock,
                &self.config,
            )
        })
    }

    /// Falling edge on channel B.
    pub fn on_channel_b_falling(&self) -> Option<Direction> {
        critical_section::with(|cs| {
            let mut pins = self.pins.borrow_ref_mut(cs);
            let pins = pins.as_mut()?;
            self.rotary.handle_falling_edge(
                cs,
                Channel::B,
                &mut pins.channel_b,
                &mut pins.channel_a,
                &mut pins.delay,
                &self.clock,
                &self.config,
            )
        })
    }

    /// Any edge on the button line. An unreadable line is ignored.
    pub fn on_button_change(&self) -> Option<ButtonEvent> {
        critical_section::with(|cs| {
            let mut pins = self.pins.borrow_ref_mut(cs);
            let pins = pins.as_mut()?;
            let line_high = pins.button.is_high().ok()?;
            self.button.handle_change(
                cs,
                line_high,
                self.clock.now_ms(),
                self.config.click_vs_hold_ms(),
            )
        })
    }
}

impl<A, B, P, D, C> RotaryEncoderWithPush<A, B, P, D, C>
where
    A: InterruptPin,
    B: InterruptPin,
    P: InterruptPin,
    D: DelayNs,
    C: Clock,
{
    /// Arm the three interrupts and hand the pins to the driver.
    ///
    /// Channels A and B trigger on falling edges, the button on any edge.
    /// Routing the GPIO vector to [`handle_interrupt`](Self::handle_interrupt)
    /// is left to the caller.
    pub fn setup(&self, mut pins: KnobPins<A, B, P, D>) {
        pins.channel_a.listen(Edge::Falling);
        pins.channel_b.listen(Edge::Falling);
        pins.button.listen(Edge::Any);
        self.install(pins);
    }

    /// Acknowledge whichever knob lines are pending and run their handlers.
    ///
    /// Meant for a GPIO vector shared by all pins. If both quadrature lines are
    /// pending at once, the rotary timeout decides which one counts.
    pub fn handle_interrupt(&self) -> InterruptOutcome {
        let (a, b, button) = critical_section::with(|cs| {
            let mut pins = self.pins.borrow_ref_mut(cs);
            match pins.as_mut() {
                Some(pins) => (
                    pins.channel_a.take_interrupt(),
                    pins.channel_b.take_interrupt(),
                    pins.button.take_interrupt(),
                ),
                None => (false, false, false),
            }
        });

        let mut outcome = InterruptOutcome::default();
        if a {
            outcome.rotation = self.on_channel_a_falling();
        }
        if b {
            let rotation = self.on_channel_b_falling();
            outcome.rotation = outcome.rotation.or(rotation);
        }
        if button {
            outcome.button = self.on_button_change();
        }
        outcome
    }
}
