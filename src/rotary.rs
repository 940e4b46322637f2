//! Quadrature decoding for the rotary half of the knob.
//!
//! Each channel has its own falling-edge handler. The encoder's channels are
//! 90° out of phase, so at a clean falling edge on one channel the other one
//! still reads high and the direction follows from which channel fell first.
//! A handler only commits a tick after the edge has held for the whole
//! debounce window, and a timeout after each accepted tick swallows the
//! trailing bounce and the complementary edge of the same detent.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::EncoderConfig;
use crate::fmt::{debug, trace};
use crate::timing::{enough_time_elapsed, Clock, Millis};

/// Quadrature line whose falling edge raised the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[inline]
    pub fn step(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

impl Channel {
    /// Direction implied by a clean falling edge on this channel.
    #[inline]
    pub fn direction(self) -> Direction {
        match self {
            Channel::A => Direction::Clockwise,
            Channel::B => Direction::CounterClockwise,
        }
    }
}

// Rotary encoder state, shared between the edge handlers and main context.
pub struct RotaryState {
    offset: Mutex<Cell<i32>>,
    last_accepted: Mutex<Cell<Option<Millis>>>,
}

impl RotaryState {
    pub const fn new() -> Self {
        Self {
            offset: Mutex::new(Cell::new(0)),
            last_accepted: Mutex::new(Cell::new(None)),
        }
    }

    /// Resolve one falling edge on `channel`.
    ///
    /// `edge` is the pin that fell and `other` the opposite channel. Returns
    /// the committed direction, or `None` when the edge was swallowed by the
    /// timeout or failed the debounce check.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_falling_edge<E, O, D, C>(
        &self,
        cs: CriticalSection,
        channel: Channel,
        edge: &mut E,
        other: &mut O,
        delay: &mut D,
        clock: &C,
        config: &EncoderConfig,
    ) -> Option<Direction>
    where
        E: InputPin,
        O: InputPin,
        D: DelayNs,
        C: Clock,
    {
        let last_accepted = self.last_accepted.borrow(cs);
        if let Some(last) = last_accepted.get() {
            if !enough_time_elapsed(clock.now_ms(), last, config.rotary_timeout_ms()) {
                trace!("rotary {}: inside timeout", channel);
                return None;
            }
        }

        for _ in 0..config.debounce_checks() {
            delay.delay_us(config.debounce_us_per_check());
            if !edge_holding(edge, other) {
                trace!("rotary {}: bounce", channel);
                return None;
            }
        }

        last_accepted.set(Some(clock.now_ms()));

        let direction = channel.direction();
        let offset = self.offset.borrow(cs);
        offset.set(offset.get().saturating_add(direction.step()));
        debug!("rotary tick {}, offset {}", direction, offset.get());

        Some(direction)
    }

    /// Take the accumulated offset, leaving zero behind.
    pub fn take_offset(&self, cs: CriticalSection) -> i32 {
        self.offset.borrow(cs).replace(0)
    }

    pub fn offset(&self, cs: CriticalSection) -> i32 {
        self.offset.borrow(cs).get()
    }

    pub fn last_accepted(&self, cs: CriticalSection) -> Option<Millis> {
        self.last_accepted.borrow(cs).get()
    }
}

impl Default for RotaryState {
    fn default() -> Self {
        Self::new()
    }
}

// The edge that fired must still be low and the other channel still high.
// A failed read is noise, same as a wrong level.
#[inline]
fn edge_holding<E: InputPin, O: InputPin>(edge: &mut E, other: &mut O) -> bool {
    matches!(edge.is_low(), Ok(true)) && matches!(other.is_high(), Ok(true))
}
