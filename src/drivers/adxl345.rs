// Reactor Core - ADXL345 Accelerometer Driver
//
// Register-level driver over the shared I2C bus.

use std::sync::Mutex;

use anyhow::anyhow;
use esp_idf_hal::i2c::I2cDriver;

use reactor_core::config::*;
use reactor_core::events::Vec3;
use reactor_core::peripherals::MotionSensor;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

// ADXL345 register addresses
const REG_DEVID: u8 = 0x00;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32; // Start of 6-byte burst (X, Y, Z little-endian)
const DEVID_EXPECTED: u8 = 0xE5;

pub struct Adxl345 {
    bus: SharedBus,
}

impl Adxl345 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_ADXL345, &[REG_DEVID], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == DEVID_EXPECTED,
            Err(_) => false,
        }
    }

    /// Full-resolution ±16 g, 100 Hz output rate, measurement mode.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;

        // 100 Hz output data rate
        bus.write(I2C_ADDR_ADXL345, &[REG_BW_RATE, 0x0A], I2C_TIMEOUT_TICKS)?;

        // FULL_RES | ±16 g
        bus.write(I2C_ADDR_ADXL345, &[REG_DATA_FORMAT, 0x0B], I2C_TIMEOUT_TICKS)?;

        // Measure bit
        bus.write(I2C_ADDR_ADXL345, &[REG_POWER_CTL, 0x08], I2C_TIMEOUT_TICKS)?;

        log::info!("ADXL345 initialised (full-res ±16g, 100Hz)");
        Ok(())
    }
}

impl MotionSensor for Adxl345 {
    /// Burst-read all 3 axes and convert to m/s².
    fn read(&mut self) -> anyhow::Result<Vec3> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_ADXL345, &[REG_DATAX0], &mut raw, I2C_TIMEOUT_TICKS)?;

        Ok(Vec3 {
            x: i16::from_le_bytes([raw[0], raw[1]]) as f32 * ADXL345_SCALE_FULL_RES,
            y: i16::from_le_bytes([raw[2], raw[3]]) as f32 * ADXL345_SCALE_FULL_RES,
            z: i16::from_le_bytes([raw[4], raw[5]]) as f32 * ADXL345_SCALE_FULL_RES,
        })
    }
}
