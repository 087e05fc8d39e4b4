// Reactor Core - Status Light Driver
//
// Single WS2812 pixel driven by the RMT peripheral.

use std::time::Duration;

use esp_idf_hal::rmt::{FixedLengthSignal, PinState, Pulse, TxRmtDriver};

use reactor_core::peripherals::StatusLight;
use reactor_core::screens;

pub struct Ws2812<'d> {
    tx: TxRmtDriver<'d>,
}

impl<'d> Ws2812<'d> {
    pub fn new(tx: TxRmtDriver<'d>) -> Self {
        Self { tx }
    }
}

impl StatusLight for Ws2812<'_> {
    /// Colors are scaled by `PIXEL_BRIGHTNESS` before transmission.
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
        let (r, g, b) = screens::dimmed((r, g, b));
        // WS2812 expects GRB, MSB first.
        let color = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);

        let ticks_hz = self.tx.counter_clock()?;
        let t0h = Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(350))?;
        let t0l = Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(800))?;
        let t1h = Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(700))?;
        let t1l = Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(600))?;

        let mut signal = FixedLengthSignal::<24>::new();
        for i in 0..24 {
            let bit = color & (1 << (23 - i)) != 0;
            let pair = if bit { (t1h, t1l) } else { (t0h, t0l) };
            signal.set(i, &pair)?;
        }
        self.tx.start_blocking(&signal)?;
        Ok(())
    }
}
