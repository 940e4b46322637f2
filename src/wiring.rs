// Board-specific pin mappings and the esp-hal glue for the knob driver.
// The profile is selected by the chip feature in Cargo.toml.
//! The following wiring is assumed (esp32s3 profile):
//! - Rotary encoder CLK (channel A) => GPIO18
//! - Rotary encoder DT  (channel B) => GPIO17
//! - Rotary encoder SW  (button)    => GPIO16
//! - GND => GND
//! - 3.3V => 3.3V
//!
//! The esp32c3 profile uses GPIO6 / GPIO7 / GPIO5 in the same order.
//! Make sure the button is connected to GND when pressed (it has a pull-up).
//! The rotary encoder should have no internal pull-ups using external 10k resistors,
//! and be connected to GND on the other side

use esp_hal::{
    delay::Delay,
    gpio::{Event, Input, InputConfig, Io, Pull},
    peripherals::Peripherals,
    timer::systimer::{SystemTimer, Unit},
};

use crate::input::{Edge, InterruptPin, KnobPins};
use crate::timing::{Clock, Millis};

pub type EspKnobPins<'a> = KnobPins<Input<'a>, Input<'a>, Input<'a>, Delay>;

impl InterruptPin for Input<'_> {
    fn listen(&mut self, edge: Edge) {
        let event = match edge {
            Edge::Falling => Event::FallingEdge,
            Edge::Rising => Event::RisingEdge,
            Edge::Any => Event::AnyEdge,
        };
        Input::listen(self, event);
    }

    fn take_interrupt(&mut self) -> bool {
        let pending = self.is_interrupt_set();
        if pending {
            self.clear_interrupt();
        }
        pending
    }
}

/// Millisecond clock backed by SYSTIMER unit 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> Millis {
        let t = SystemTimer::unit_value(Unit::Unit0);
        // Truncate to the 32-bit wrapping counter the driver works in.
        (t.saturating_mul(1000) / SystemTimer::ticks_per_second()) as Millis
    }
}

fn knob_input<'a>(pin: impl esp_hal::gpio::InputPin + 'a, pull: Pull) -> Input<'a> {
    Input::new(pin, InputConfig::default().with_pull(pull))
}

cfg_if::cfg_if! {
    if #[cfg(feature = "esp32s3")] {
        /// Create the knob inputs (not yet listening) and the GPIO driver.
        pub fn init_knob_pins<'a>(p: Peripherals) -> (Io<'a>, EspKnobPins<'a>) {
            let io = Io::new(p.IO_MUX);

            let pins = KnobPins {
                channel_a: knob_input(p.GPIO18, Pull::None),
                channel_b: knob_input(p.GPIO17, Pull::None),
                button: knob_input(p.GPIO16, Pull::Up),
                delay: Delay::new(),
            };

            (io, pins)
        }
    } else if #[cfg(feature = "esp32c3")] {
        pub fn init_knob_pins<'a>(p: Peripherals) -> (Io<'a>, EspKnobPins<'a>) {
            let io = Io::new(p.IO_MUX);

            let pins = KnobPins {
                channel_a: knob_input(p.GPIO6, Pull::None),
                channel_b: knob_input(p.GPIO7, Pull::None),
                button: knob_input(p.GPIO5, Pull::Up),
                delay: Delay::new(),
            };

            (io, pins)
        }
    } else {
        compile_error!("the `esp` feature needs a chip feature: `esp32s3` or `esp32c3`");
    }
}
