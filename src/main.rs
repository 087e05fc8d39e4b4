// Reactor Core - Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the shared I2C bus, OLED and accelerometer.
//   2. Configure the knob, button and status light.
//   3. Spawn the game task, which calibrates the accelerometer (board must be
//      still) and then runs the Menu -> Play -> GameOver loop forever.
//
// A calibration failure ends the game task with an error; `main` returns it
// and ESP-IDF reboots the board.

#[cfg(target_os = "espidf")]
mod drivers;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::Mutex;
    use std::thread;

    use esp_idf_hal::gpio::{IOPin, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_hal::rmt::config::TransmitConfig;
    use esp_idf_hal::rmt::TxRmtDriver;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use reactor_core::config::*;
    use reactor_core::game::RandomPicker;
    use reactor_core::peripherals::{Board, SystemClock};
    use reactor_core::tasks;

    use crate::drivers::adxl345::Adxl345;
    use crate::drivers::button::GpioButton;
    use crate::drivers::encoder::QuadratureEncoder;
    use crate::drivers::oled::OledDisplay;
    use crate::drivers::pixel::Ws2812;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let variant = if cfg!(feature = "variant-b") {
        Variant::B
    } else {
        Variant::A
    };
    log::info!("Reactor Core firmware starting (variant {})…", variant.name);

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus (shared between OLED and ADXL345) ------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    // The bus lives for the entire programme duration (firmware never exits).
    let i2c_bus: &'static Mutex<I2cDriver<'static>> = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- Display + accelerometer self-test --------------------------------
    let mut display = OledDisplay::new(i2c_bus);
    if !display.is_connected() {
        log::error!("SSD1306 not found at 0x{:02X}", I2C_ADDR_OLED);
    }
    if let Err(e) = display.init() {
        log::error!("OLED init failed: {:#}", e);
    }

    let accel = Adxl345::new(i2c_bus);
    if !accel.is_connected() {
        log::error!("ADXL345 not found at 0x{:02X}", I2C_ADDR_ADXL345);
    }
    accel.init()?;

    // ---- Knob + button (pull-up, active LOW) -------------------------------
    let mut encoder_a = PinDriver::input(peripherals.pins.gpio2.downgrade())?;
    encoder_a.set_pull(Pull::Up)?;
    let mut encoder_b = PinDriver::input(peripherals.pins.gpio3.downgrade())?;
    encoder_b.set_pull(Pull::Up)?;
    let mut button_pin = PinDriver::input(peripherals.pins.gpio4.downgrade())?;
    button_pin.set_pull(Pull::Up)?;
    log::info!(
        "Inputs: encoder GPIO{}/GPIO{}, button GPIO{}",
        PIN_ENCODER_A,
        PIN_ENCODER_B,
        PIN_BUTTON
    );

    // ---- Status light -----------------------------------------------------
    let rmt_config = TransmitConfig::new().clock_divider(1);
    let pixel_tx = TxRmtDriver::new(peripherals.rmt.channel0, peripherals.pins.gpio5, &rmt_config)?;
    log::info!("Status light on GPIO{}", PIN_PIXEL);

    let board = Board {
        motion: accel,
        encoder: QuadratureEncoder::new(encoder_a, encoder_b)?,
        button: GpioButton::new(button_pin),
        light: Ws2812::new(pixel_tx),
        display,
    };

    // Hardware RNG for round targets.
    let seed = unsafe { esp_idf_sys::esp_random() };
    let picker = RandomPicker(SmallRng::seed_from_u64(u64::from(seed)));

    // ---- Spawn game task --------------------------------------------------
    let game = thread::Builder::new()
        .name("game".into())
        .stack_size(STACK_GAME)
        .spawn(move || tasks::game::game_task(board, SystemClock::new(), variant, picker))?;

    match game.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("game task panicked"),
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!(
        "reactor-core is ESP-IDF firmware; build it for an espidf target \
         (the game core in the library builds and tests on any host)"
    )
}
