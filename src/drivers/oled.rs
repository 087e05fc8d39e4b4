// Reactor Core - SSD1306 OLED Driver
//
// Renders four text lines into the in-RAM `TextScreen` and pushes the whole
// frame over the shared I2C bus.

use anyhow::anyhow;

use reactor_core::config::*;
use reactor_core::display::TextScreen;
use reactor_core::peripherals::TextDisplay;

use super::adxl345::SharedBus;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const DATA_CHUNK: usize = 16;

// 128×64, horizontal addressing, charge pump on.
const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH
    0xA4, // resume from RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

pub struct OledDisplay {
    bus: SharedBus,
    screen: TextScreen,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            screen: TextScreen::new(),
        }
    }

    /// Verify the panel acknowledges its address.
    pub fn is_connected(&self) -> bool {
        self.command(&[0xE3]).is_ok() // NOP
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        self.command(INIT_SEQUENCE)?;
        self.screen.clear();
        self.flush()?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    fn command(&self, commands: &[u8]) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        let mut frame = Vec::with_capacity(commands.len() + 1);
        frame.push(CONTROL_COMMAND);
        frame.extend_from_slice(commands);
        bus.write(I2C_ADDR_OLED, &frame, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        // full column and page window
        self.command(&[0x21, 0, (SCREEN_WIDTH - 1) as u8, 0x22, 0, (SCREEN_HEIGHT / 8 - 1) as u8])?;

        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        let mut frame = [0u8; DATA_CHUNK + 1];
        frame[0] = CONTROL_DATA;
        for chunk in self.screen.buffer().chunks(DATA_CHUNK) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &frame[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}

impl TextDisplay for OledDisplay {
    fn show(&mut self, line1: &str, line2: &str, line3: &str, line4: &str) -> anyhow::Result<()> {
        self.screen.render([line1, line2, line3, line4]);
        self.flush()
    }
}
