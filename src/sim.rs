//! Simulated board for host tests.
//!
//! One shared timeline drives the three input lines, the delay used by the
//! debounce loop and the millisecond clock. Level changes can be scheduled in
//! the future so bounce lands in the middle of a debounce window.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};

use crate::input::{Edge, InterruptPin, KnobPins};
use crate::timing::{Clock, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    A = 0,
    B = 1,
    Button = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct Board {
    now_us: u64,
    levels: [bool; 3],
    faulty: [bool; 3],
    armed: [Option<Edge>; 3],
    pending: [bool; 3],
    schedule: Vec<(u64, Line, bool)>,
}

impl Board {
    fn drive(&mut self, line: Line, high: bool) {
        let i = line as usize;
        let was = self.levels[i];
        self.levels[i] = high;
        let fired = match self.armed[i] {
            Some(Edge::Falling) => was && !high,
            Some(Edge::Rising) => !was && high,
            Some(Edge::Any) => was != high,
            None => false,
        };
        if fired {
            self.pending[i] = true;
        }
    }

    fn apply_due(&mut self) {
        let now = self.now_us;
        let mut due: Vec<_> = self.schedule.iter().copied().filter(|(at, _, _)| *at <= now).collect();
        self.schedule.retain(|(at, _, _)| *at > now);
        due.sort_by_key(|(at, _, _)| *at);
        for (_, line, high) in due {
            self.drive(line, high);
        }
    }
}

/// Handle to the shared timeline. Clones refer to the same board.
#[derive(Clone)]
pub struct SimBoard(Rc<RefCell<Board>>);

impl SimBoard {
    /// Both quadrature lines and the button idle high (pulled up).
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Board {
            now_us: 0,
            levels: [true; 3],
            faulty: [false; 3],
            armed: [None; 3],
            pending: [false; 3],
            schedule: Vec::new(),
        })))
    }

    pub fn pins(&self) -> KnobPins<SimPin, SimPin, SimPin, SimDelay> {
        KnobPins {
            channel_a: self.pin(Line::A),
            channel_b: self.pin(Line::B),
            button: self.pin(Line::Button),
            delay: SimDelay(self.clone()),
        }
    }

    pub fn pin(&self, line: Line) -> SimPin {
        SimPin { board: self.clone(), line }
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    pub fn set(&self, line: Line, high: bool) {
        self.0.borrow_mut().drive(line, high);
    }

    /// Change `line` once `after_us` more microseconds have passed.
    pub fn schedule(&self, after_us: u64, line: Line, high: bool) {
        let mut b = self.0.borrow_mut();
        let at = b.now_us + after_us;
        b.schedule.push((at, line, high));
    }

    pub fn set_faulty(&self, line: Line, faulty: bool) {
        self.0.borrow_mut().faulty[line as usize] = faulty;
    }

    pub fn advance_us(&self, us: u64) {
        let mut b = self.0.borrow_mut();
        b.now_us += us;
        b.apply_due();
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1_000);
    }

    pub fn set_time_ms(&self, ms: u64) {
        let mut b = self.0.borrow_mut();
        b.now_us = ms * 1_000;
        b.apply_due();
    }

    pub fn now_us(&self) -> u64 {
        self.0.borrow().now_us
    }

    pub fn armed(&self, line: Line) -> Option<Edge> {
        self.0.borrow().armed[line as usize]
    }

    pub fn pending(&self, line: Line) -> bool {
        self.0.borrow().pending[line as usize]
    }
}

pub struct SimPin {
    board: SimBoard,
    line: Line,
}

impl SimPin {
    fn level(&self) -> Result<bool, SimPinError> {
        let b = self.board.0.borrow();
        let i = self.line as usize;
        if b.faulty[i] {
            Err(SimPinError)
        } else {
            Ok(b.levels[i])
        }
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|high| !high)
    }
}

impl InterruptPin for SimPin {
    fn listen(&mut self, edge: Edge) {
        self.board.0.borrow_mut().armed[self.line as usize] = Some(edge);
    }

    fn take_interrupt(&mut self) -> bool {
        let mut b = self.board.0.borrow_mut();
        core::mem::replace(&mut b.pending[self.line as usize], false)
    }
}

/// Busy-wait stand-in: advances the shared timeline instead of spinning.
pub struct SimDelay(SimBoard);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance_us(u64::from(ns).div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance_ms(u64::from(ms));
    }
}

#[derive(Clone)]
pub struct SimClock(SimBoard);

impl Clock for SimClock {
    fn now_ms(&self) -> Millis {
        // Truncation reproduces the hardware counter wrap.
        (self.0.now_us() / 1_000) as Millis
    }
}
