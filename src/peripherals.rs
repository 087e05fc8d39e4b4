// Reactor Core - Peripheral Contracts
//
// The narrow interfaces the game core consumes.  Bus bring-up, quadrature
// decoding, text layout and LED signalling live behind these traits in the
// firmware's `drivers` module; tests plug in fakes.

use std::thread;
use std::time::{Duration, Instant};

use crate::events::Vec3;

/// Three-axis accelerometer.
pub trait MotionSensor {
    /// Instantaneous acceleration in m/s².
    fn read(&mut self) -> anyhow::Result<Vec3>;
}

/// Rotary knob, already quadrature-decoded and debounced.
pub trait RotaryEncoder {
    fn position(&mut self) -> i32;
}

/// Push-button on a pull-up input.
pub trait Button {
    /// `true` = released, `false` = pressed (active LOW).
    fn level(&mut self) -> bool;
}

/// Single RGB status light.
pub trait StatusLight {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> anyhow::Result<()>;
}

/// Four-line text display; the implementation handles centering.
pub trait TextDisplay {
    fn show(&mut self, line1: &str, line2: &str, line3: &str, line4: &str) -> anyhow::Result<()>;
}

/// Monotonic time source plus blocking delay.
pub trait Clock {
    /// Time elapsed since boot.
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Everything the console drives, bundled so it can be moved in one piece.
pub struct Board<M, E, B, L, D> {
    pub motion: M,
    pub encoder: E,
    pub button: B,
    pub light: L,
    pub display: D,
}

// ---------------------------------------------------------------------------
// std clock (ESP-IDF maps std::time/std::thread onto esp_timer/FreeRTOS)
// ---------------------------------------------------------------------------
pub struct SystemClock {
    boot: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { boot: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.boot.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
