//! Rotary knob demo
//! ========================================
//! cargo run --release --features esp32s3
//! ========================================
//!
//! Tracks an absolute knob position from the relative offsets the driver
//! reports, and prints clicks and holds of the push button.

//% CHIPS: esp32s3 esp32c3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
// The macro automatically fills in the fields.
esp_bootloader_esp_idf::esp_app_desc!();

use esp_backtrace as _;

// ESP-HAL imports
use esp_hal::{delay::Delay, gpio::Input, handler, main, ram, Config};

// Println macro
use esp_println::println;

use rotary_push::{
    wiring::{init_knob_pins, SystemClock},
    EncoderConfig, RotaryEncoderWithPush,
};

// 50us debounce in 4 samples, 2ms between ticks, 1s click/hold split
const KNOB_CONFIG: EncoderConfig = match EncoderConfig::new(50, 4, 2, 1_000) {
    Ok(cfg) => cfg,
    Err(_) => panic!("invalid knob timing"),
};

// Shared knob state, reached from the GPIO interrupt handler
static KNOB: RotaryEncoderWithPush<
    Input<'static>,
    Input<'static>,
    Input<'static>,
    Delay,
    SystemClock,
> = RotaryEncoderWithPush::new(KNOB_CONFIG, SystemClock);

// Interrupt handler
#[handler]
#[ram]
fn handler() {
    KNOB.handle_interrupt();
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());

    // one call gives you IO handler + knob pins from wiring.rs
    let (mut io, pins) = init_knob_pins(peripherals);

    // Arm edges and stash pins in the driver before interrupts can fire
    KNOB.setup(pins);
    io.set_interrupt_handler(handler);

    println!(
        "knob ready, handler latency up to {}us",
        KNOB.config().worst_case_debounce_us()
    );

    let mut knob_position: i32 = 0;
    let mut reported_hold = false;

    loop {
        if KNOB.knob_changed_since_last_check() {
            knob_position = knob_position.saturating_add(KNOB.retrieve_offset_since_last_check());
            println!("Knob: {}", knob_position);
        }

        if KNOB.button_clicked_since_last_check() {
            println!("Clicks: {}", KNOB.retrieve_click_count());
        }

        // Report a hold once while it is happening, and its length on release
        if KNOB.button_hold_occurring() {
            if !reported_hold {
                println!("Holding...");
                reported_hold = true;
            }
        } else if reported_hold && !KNOB.button_is_currently_depressed() {
            println!("Held for {}ms", KNOB.retrieve_millis_held_for());
            reported_hold = false;
        }
    }
}
