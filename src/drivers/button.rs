// Reactor Core - Button Driver
//
// Debounced level of the active-LOW user button.  Tap classification happens
// in the game core; this only hides contact bounce.

use std::time::{Duration, Instant};

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

use reactor_core::config::*;
use reactor_core::peripherals::Button;

pub struct GpioButton<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
    debounce: Duration,

    // Debounce state
    last_raw: bool,
    last_change: Instant,
    stable: bool,
}

impl<'d> GpioButton<'d> {
    pub fn new(pin: PinDriver<'d, AnyIOPin, Input>) -> Self {
        Self {
            pin,
            debounce: Duration::from_millis(BUTTON_DEBOUNCE_MS),
            last_raw: true, // pull-up -> idle HIGH
            last_change: Instant::now(),
            stable: true,
        }
    }
}

impl Button for GpioButton<'_> {
    fn level(&mut self) -> bool {
        let current = self.pin.is_high(); // true = released (pull-up)
        let now = Instant::now();

        if current != self.last_raw {
            self.last_raw = current;
            self.last_change = now;
        }
        if now.duration_since(self.last_change) >= self.debounce {
            self.stable = current;
        }
        self.stable
    }
}
