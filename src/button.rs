//! Push-button click/hold state machine.
//!
//! The button is active-low. The change handler sees every edge; a press that
//! is released before `click_vs_hold_ms` counts as a click, anything longer is
//! a hold whose duration is kept until the next hold completes.

use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::fmt::debug;
use crate::timing::{elapsed_since, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    Released,
    Depressed { since: Millis },
}

/// What a single button edge resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed,
    Clicked,
    Held(Millis),
}

// Button state struct
pub struct ButtonState {
    press: Mutex<Cell<PressState>>,
    held_for: Mutex<Cell<Millis>>,
    clicks: Mutex<Cell<u32>>,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            press: Mutex::new(Cell::new(PressState::Released)),
            held_for: Mutex::new(Cell::new(0)),
            clicks: Mutex::new(Cell::new(0)),
        }
    }

    /// Apply the line level seen after a change interrupt.
    ///
    /// A level that matches the current state (chatter, or an edge the
    /// hardware coalesced) changes nothing.
    pub fn handle_change(
        &self,
        cs: CriticalSection,
        line_high: bool,
        now: Millis,
        click_vs_hold_ms: Millis,
    ) -> Option<ButtonEvent> {
        let press = self.press.borrow(cs);
        match (press.get(), line_high) {
            (PressState::Released, false) => {
                press.set(PressState::Depressed { since: now });
                Some(ButtonEvent::Pressed)
            }
            (PressState::Depressed { since }, true) => {
                press.set(PressState::Released);
                let held = elapsed_since(since, now);
                if held < click_vs_hold_ms {
                    let clicks = self.clicks.borrow(cs);
                    clicks.set(clicks.get().saturating_add(1));
                    debug!("button click ({}ms), {} pending", held, clicks.get());
                    Some(ButtonEvent::Clicked)
                } else {
                    self.held_for.borrow(cs).set(held);
                    debug!("button held {}ms", held);
                    Some(ButtonEvent::Held(held))
                }
            }
            _ => None,
        }
    }

    pub fn press_state(&self, cs: CriticalSection) -> PressState {
        self.press.borrow(cs).get()
    }

    pub fn is_depressed(&self, cs: CriticalSection) -> bool {
        matches!(self.press_state(cs), PressState::Depressed { .. })
    }

    /// Depressed for at least `click_vs_hold_ms` as of `now`.
    pub fn hold_occurring(&self, cs: CriticalSection, now: Millis, click_vs_hold_ms: Millis) -> bool {
        match self.press_state(cs) {
            PressState::Depressed { since } => elapsed_since(since, now) >= click_vs_hold_ms,
            PressState::Released => false,
        }
    }

    /// Live hold time while depressed, otherwise the last completed hold.
    pub fn millis_held_for(&self, cs: CriticalSection, now: Millis) -> Millis {
        match self.press_state(cs) {
            PressState::Depressed { since } => elapsed_since(since, now),
            PressState::Released => self.held_for.borrow(cs).get(),
        }
    }

    pub fn click_count(&self, cs: CriticalSection) -> u32 {
        self.clicks.borrow(cs).get()
    }

    pub fn take_click_count(&self, cs: CriticalSection) -> u32 {
        self.clicks.borrow(cs).replace(0)
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}
